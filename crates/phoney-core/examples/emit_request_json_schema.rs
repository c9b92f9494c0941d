use phoney_core::{
    CONTRACT_VERSION, ErrorBody, GenerateRequest, GenerateResponse, ValidateRequest,
    ValidateResponse,
};
use schemars::schema_for;

fn main() {
    let schemas = serde_json::json!({
        "contract_version": CONTRACT_VERSION,
        "generate_request": schema_for!(GenerateRequest),
        "generate_response": schema_for!(GenerateResponse),
        "validate_request": schema_for!(ValidateRequest),
        "validate_response": schema_for!(ValidateResponse),
        "error_body": schema_for!(ErrorBody),
    });
    let json = serde_json::to_string_pretty(&schemas).expect("serialize json schema");
    println!("{json}");
}
