//! Built-in sample requests shown by `phoney examples`.

use phoney_core::GenerateRequest;
use serde_json::{Value, json};

pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    pub request: GenerateRequest,
}

fn sample(
    name: &'static str,
    description: &'static str,
    template: Value,
    count: usize,
    configure: impl FnOnce(&mut GenerateRequest),
) -> Sample {
    let mut request = GenerateRequest::new(template, count);
    configure(&mut request);
    Sample {
        name,
        description,
        request,
    }
}

pub fn samples() -> Vec<Sample> {
    vec![
        sample(
            "basic_user",
            "Flat user record with a seeded age",
            json!({
                "name": "{{name}}",
                "email": "{{email}}",
                "phone": "{{phone}}",
                "age": "{{random_int:min=18,max=80}}"
            }),
            5,
            |request| request.seed = Some(42),
        ),
        sample(
            "ecommerce",
            "Nested user profile and order with array fields",
            json!({
                "user": {
                    "profile": {
                        "user_id": "{{uuid4}}",
                        "name": "{{name}}",
                        "email": "{{email}}",
                        "join_date": "{{date_between:start_date=-2y,end_date=today}}"
                    },
                    "address": {
                        "street": "{{street_address}}",
                        "city": "{{city}}",
                        "state": "{{state}}",
                        "zip": "{{zipcode}}",
                        "country": "{{country}}"
                    }
                },
                "order": {
                    "order_id": "{{uuid4}}",
                    "products": "{{[catch_phrase]:count=3}}",
                    "quantities": "{{[random_int]:count=3,min=1,max=5}}",
                    "total": "{{pydecimal:left_digits=3,right_digits=2}}",
                    "order_date": "{{date_between:start_date=-6m,end_date=today}}",
                    "status": "{{random_element:elements=pending|shipped|delivered|returned}}"
                }
            }),
            3,
            |request| request.locale = Some("en_US".to_string()),
        ),
        sample(
            "company",
            "Company profile with employee and location arrays",
            json!({
                "company": "{{company}}",
                "founded": "{{date_between:start_date=-50y,end_date=-1y}}",
                "employees": "{{[name]:count=10}}",
                "departments": "{{[word]:count=5}}",
                "locations": "{{[city]:count=3}}",
                "revenue": "{{pydecimal:left_digits=8,right_digits=2}}",
                "products": "{{[catch_phrase]:count=7}}"
            }),
            2,
            |_| {},
        ),
        sample(
            "contact_list",
            "Localized contact card",
            json!({
                "name": "{{name}}",
                "address": "{{address}}",
                "phone": "{{phone}}",
                "company": "{{company}}",
                "job": "{{job}}",
                "summary": "{{name}} works at {{company}} in {{city}}"
            }),
            3,
            |request| request.locale = Some("fr_FR".to_string()),
        ),
        sample(
            "financial",
            "Account, customer and transaction history",
            json!({
                "account": {
                    "account_id": "{{uuid4}}",
                    "account_number": "{{random_number:digits=10,fix_len=true}}",
                    "routing_number": "{{random_number:digits=9,fix_len=true}}",
                    "balance": "{{pydecimal:left_digits=6,right_digits=2}}",
                    "currency": "{{currency_code}}"
                },
                "customer": {
                    "customer_id": "{{uuid4}}",
                    "name": "{{name}}",
                    "ssn": "{{ssn}}",
                    "credit_score": "{{random_int:min=300,max=850}}",
                    "income": "{{pydecimal:left_digits=6,right_digits=2}}"
                },
                "transactions": "{{[pydecimal]:count=5,left_digits=4,right_digits=2}}",
                "transaction_dates": "{{[date_between]:count=5,start_date=-1y,end_date=today}}"
            }),
            2,
            |_| {},
        ),
        sample(
            "blog",
            "Article with author and comments",
            json!({
                "article": {
                    "id": "{{uuid4}}",
                    "title": "{{catch_phrase}}",
                    "slug": "{{slug}}",
                    "content": "{{text:max_nb_chars=1000}}",
                    "summary": "{{text:max_nb_chars=200}}",
                    "tags": "{{[word]:count=5}}",
                    "category": "{{word}}",
                    "published_date": "{{date_between:start_date=-1y,end_date=today}}",
                    "view_count": "{{random_int:min=0,max=10000}}"
                },
                "author": {
                    "author_id": "{{uuid4}}",
                    "name": "{{name}}",
                    "bio": "{{text:max_nb_chars=300}}",
                    "social_media": {
                        "twitter": "{{user_name}}",
                        "website": "{{url}}"
                    }
                },
                "comments": "{{[text]:count=3,max_nb_chars=150}}"
            }),
            2,
            |_| {},
        ),
        sample(
            "error_demo",
            "Invalid template showing validation errors and suggestions",
            json!({
                "name": "{{name}}",
                "invalid_field": "{{nonexistent_generator}}",
                "typo": "{{emial}}",
                "bad_params": "{{random_int:invalid_param=true}}"
            }),
            1,
            |_| {},
        ),
    ]
}

pub fn find_sample(name: &str) -> Option<Sample> {
    samples().into_iter().find(|sample| sample.name == name)
}
