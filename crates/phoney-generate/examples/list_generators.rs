use phoney_generate::generators::GeneratorRegistry;

fn main() {
    let registry = GeneratorRegistry::new();
    for info in registry.catalog() {
        if info.aliases.is_empty() {
            println!("{:<12} {}", info.provider, info.name);
        } else {
            println!(
                "{:<12} {} (aliases: {})",
                info.provider,
                info.name,
                info.aliases.join(", ")
            );
        }
    }
}
