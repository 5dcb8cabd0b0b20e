use anyhow::{Context, Result};
use ingredient_combiner::{CombinerConfig, GroceryList, IngredientCombiner, IngredientRecord};
use log::{debug, info};
use std::env;
use std::io::Read;

const USAGE: &str = "Usage: ingredient-combiner [--json] [FILE ...]

Each FILE holds a JSON array of {\"quantity\", \"unit\", \"name\"} records
scraped from one recipe. With no FILE, one array is read from stdin.
Set INGREDIENT_COMBINER_CONFIG to a JSON file to override the built-in tables.";

fn main() -> Result<()> {
    // Load environment variables from .env file, RUST_LOG included
    dotenv::dotenv().ok();

    // Initialize logging
    env_logger::init();

    let mut json_output = false;
    let mut files = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json_output = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => files.push(arg),
        }
    }

    let config = CombinerConfig::from_env()?;
    let combiner = IngredientCombiner::new(&config).context("Invalid combiner configuration")?;
    let mut list = GroceryList::new(combiner);

    if files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read records from stdin")?;
        list.add_recipe("stdin", parse_records(&input).context("Invalid records on stdin")?);
    } else {
        for path in &files {
            let input = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {path}"))?;
            let records = parse_records(&input).with_context(|| format!("Invalid records in {path}"))?;
            debug!("Read {} records from {}", records.len(), path);
            list.add_recipe(path, records);
        }
    }

    let combined = list.combined();
    info!("{} records combined into {} items", list.len(), combined.len());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&combined)?);
    } else {
        for item in &combined {
            println!("{item}");
        }
    }

    Ok(())
}

fn parse_records(json: &str) -> Result<Vec<IngredientRecord>> {
    Ok(serde_json::from_str(json)?)
}
