use std::env;
use std::path::PathBuf;

use phoney_generate::output::documents_to_csv;
use phoney_generate::{GenerateOptions, TemplateEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut template_path: Option<PathBuf> = None;
    let mut count = 1_usize;
    let mut seed: Option<u64> = None;
    let mut locale: Option<String> = None;
    let mut csv = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--count" => count = args.next().ok_or("missing --count value")?.parse()?,
            "--seed" => seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            "--locale" => locale = args.next(),
            "--csv" => csv = true,
            _ => {
                if template_path.is_none() {
                    template_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let template_path = template_path.ok_or("missing template path")?;
    let template: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&template_path)?)?;

    let engine = TemplateEngine::new(GenerateOptions::default());
    let response = engine.generate_bulk(&template, count, locale.as_deref(), seed)?;

    if csv {
        print!("{}", documents_to_csv(&response.documents)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}
