//! CLI for GenStudio - AI image-editing tools.

use clap::{Args, Parser, Subcommand};
use genstudio::catalog::{self, ToolCategory, SAMPLE_IMAGES};
use genstudio::{Dispatcher, ToolSession};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "genstudio")]
#[command(about = "AI image-editing tools: pose variation, background swap, watermark removal, creative generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tool catalog
    Tools,

    /// List background presets and product categories
    Presets,

    /// Run a tool against an image and/or prompt
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Tool id from the catalog (e.g. fission, creative, bg-swap-product)
    tool: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Source image file (png, jpeg or webp)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Use a built-in sample image instead of --input (index 0-4)
    #[arg(long, conflicts_with = "input")]
    sample: Option<usize>,

    /// Prompt text
    #[arg(short, long)]
    prompt: Option<String>,

    /// Tag to append to the prompt (repeatable)
    #[arg(long)]
    tag: Vec<String>,

    /// Background preset id (background-swap tools)
    #[arg(long)]
    preset: Option<String>,

    /// Product category id (background-swap tools)
    #[arg(long)]
    category: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tools => list_tools(cli.json)?,
        Commands::Presets => list_presets(cli.json)?,
        Commands::Generate(args) => generate(args, cli.json).await?,
    }

    Ok(())
}

fn list_tools(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let tools: Vec<_> = catalog::TOOLS
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "name": t.name,
                    "category": t.category.label(),
                    "description": t.description,
                    "new": t.is_new,
                    "hot": t.is_hot,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    for category in ToolCategory::all() {
        println!("{}", category.label());
        for tool in catalog::tools_in(*category) {
            let marker = if tool.is_new {
                " [new]"
            } else if tool.is_hot {
                " [hot]"
            } else {
                ""
            };
            println!("  {:<18} {}{}", tool.id, tool.description, marker);
        }
        println!();
    }
    Ok(())
}

fn list_presets(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let result = serde_json::json!({
            "background_presets": catalog::BACKGROUND_PRESETS
                .iter()
                .map(|p| serde_json::json!({"id": p.id, "name": p.name, "prompt": p.prompt}))
                .collect::<Vec<_>>(),
            "product_categories": catalog::PRODUCT_CATEGORIES
                .iter()
                .map(|c| serde_json::json!({"id": c.id, "label": c.label}))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Background presets");
    for preset in catalog::BACKGROUND_PRESETS {
        if preset.prompt.is_empty() {
            println!("  {:<14} {} (free text)", preset.id, preset.name);
        } else {
            println!("  {:<14} {} - {}", preset.id, preset.name, preset.prompt);
        }
    }
    println!();
    println!("Product categories");
    for category in catalog::PRODUCT_CATEGORIES {
        println!("  {:<14} {}", category.id, category.label);
    }
    Ok(())
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let mut session = ToolSession::new(&args.tool)?;

    if let Some(ref input_path) = args.input {
        session.upload(&std::fs::read(input_path)?)?;
    } else if let Some(index) = args.sample {
        let url = SAMPLE_IMAGES
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("sample index out of range (0-{})", SAMPLE_IMAGES.len() - 1))?;
        let client = reqwest::Client::new();
        session.select_sample(&client, url).await?;
    }

    if let Some(ref prompt) = args.prompt {
        session.set_prompt(prompt);
    }
    for tag in &args.tag {
        session.append_tag(tag);
    }
    if let Some(ref preset) = args.preset {
        session.select_preset(preset)?;
    }
    if let Some(ref category) = args.category {
        session.select_category(category)?;
    }

    let dispatcher = Dispatcher::new();
    let result = session.generate(&dispatcher).await?;

    let bytes = result.image.decode()?;
    std::fs::write(&args.output, &bytes)?;

    if json_output {
        let summary = serde_json::json!({
            "success": true,
            "tool": args.tool,
            "output": args.output.display().to_string(),
            "size_bytes": bytes.len(),
            "media_type": result.image.media_type().mime_type(),
            "prompt": result.prompt,
            "id": result.id,
            "timestamp_ms": result.timestamp_ms,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Generated image: {} ({} bytes) via {}",
            args.output.display(),
            bytes.len(),
            session.tool().name
        );
    }

    Ok(())
}
