//! Categories command - list the category and template registries.

use clap::Args;
use console::style;
use serde::Serialize;

use docsort_core::registry::CategoryDef;
use docsort_core::{DocumentAnalyzer, FALLBACK_CATEGORY, TemplateStats};

use super::config::load_config;

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Also list issuer templates
    #[arg(long)]
    templates: bool,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateSummary {
    id: String,
    company: String,
    category: String,
    indicators: Vec<String>,
    confidence_boost: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Listing {
    categories: Vec<CategoryDef>,
    fallback: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    templates: Option<Vec<TemplateSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_stats: Option<TemplateStats>,
}

pub async fn run(args: CategoriesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let analyzer = DocumentAnalyzer::from_config(&config)?;

    let categories = analyzer.classifier().registry().definitions();
    let templates = args.templates.then(|| {
        analyzer
            .matcher()
            .registry()
            .iter()
            .map(|t| TemplateSummary {
                id: t.id.clone(),
                company: t.company.clone(),
                category: t.category.clone(),
                indicators: t.indicators.clone(),
                confidence_boost: t.confidence_boost,
            })
            .collect::<Vec<_>>()
    });
    let template_stats = args.templates.then(|| analyzer.template_stats());

    let listing = Listing {
        categories,
        fallback: FALLBACK_CATEGORY,
        templates,
        template_stats,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{}", style("Categories:").bold());
    for category in &listing.categories {
        println!(
            "  {} (weight {}, {} keywords, {} aliases)",
            style(&category.id).cyan(),
            category.weight,
            category.keywords.len(),
            category.aliases.len()
        );
        println!("    {}", category.keywords.join(", "));
    }
    println!("  {} (fallback)", style(listing.fallback).dim());

    if let (Some(templates), Some(stats)) = (&listing.templates, &listing.template_stats) {
        println!();
        println!("{}", style("Templates:").bold());
        for template in templates {
            println!(
                "  {} - {} -> {} (boost {})",
                style(&template.id).cyan(),
                template.company,
                template.category,
                template.confidence_boost
            );
        }
        println!();
        println!(
            "{} {} templates, {} categories, {} companies",
            style("ℹ").blue(),
            stats.total_templates,
            stats.categories.len(),
            stats.companies.len()
        );
    }

    Ok(())
}
