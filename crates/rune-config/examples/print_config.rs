/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Morph Configuration ===\n");

    println!("Transitions:");
    println!("  Enabled: {}", config.transitions.enabled);
    println!("  Default: {:?}", config.transitions.default);
    for (component, timing) in &config.transitions.overrides {
        println!("  Override {}: {:?}", component, timing);
    }
    println!();

    println!("Layout:");
    println!("  Viewport: {}x{}", config.layout.width, config.layout.height);
    println!();

    println!("Logging:");
    println!("  Filter: {}", config.logging.filter);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
