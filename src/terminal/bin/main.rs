use std::io;
use dialoguer::Input;
use bookshelf::catalog::factory;
use bookshelf::core::domain::Configuration;
use bookshelf::terminal::menu::{handle, render_menu, MenuChoice, Prompter};
use bookshelf::utils::logs::{setup_tracing, LogFormat};

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Configuration::from_env();
    setup_tracing(&config, LogFormat::Compact);

    println!("Starting the library catalog...");
    let catalog = factory::create_catalog_service(&config).await?;
    let mut prompter = DialoguerPrompter;

    loop {
        println!("\n{}", render_menu());
        let input = match prompter.ask("Enter your choice (1-6)") {
            Ok(input) => input,
            Err(_) => {
                println!("\nProgram terminated. Goodbye!");
                break;
            }
        };
        let choice = match input.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(_) => {
                println!("Invalid choice! Please enter a number between 1 and 6.");
                continue;
            }
        };
        match handle(catalog.as_ref(), choice, &mut prompter).await {
            Ok(Some(message)) => println!("{}", message),
            Ok(None) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => println!("Unexpected error: {}", err),
        }
    }
    Ok(())
}
