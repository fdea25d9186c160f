//! Record formatting shared by `analyze` and `batch`.

use docsort_core::rules::format_iban;
use docsort_core::{AnalysisRecord, CategorySource, ContentStatus};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

const CSV_HEADER: [&str; 12] = [
    "filename",
    "category",
    "confidence",
    "company",
    "template",
    "year",
    "total_amount",
    "dates",
    "keywords",
    "category_source",
    "keyword_category",
    "content",
];

pub fn format_record(record: &AnalysisRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(std::slice::from_ref(record)),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// One CSV document with a header and a row per record.
pub fn format_csv(records: &[AnalysisRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.write_record(csv_row(record))?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn csv_row(record: &AnalysisRecord) -> [String; 12] {
    [
        record.filename.clone(),
        record.category.clone(),
        record.confidence.to_string(),
        record.company.clone(),
        record.template.clone().unwrap_or_default(),
        record.year.clone(),
        record
            .metadata
            .total_amount
            .map(|t| format!("{t:.2}"))
            .unwrap_or_default(),
        record.metadata.dates.clone().unwrap_or_default().join(";"),
        record.keywords.join(";"),
        source_label(record.category_source).to_string(),
        record.keyword_category.clone(),
        content_label(&record.content).to_string(),
    ]
}

pub fn source_label(source: CategorySource) -> &'static str {
    match source {
        CategorySource::Fallback => "fallback",
        CategorySource::Keywords => "keywords",
        CategorySource::Template => "template",
    }
}

pub fn content_label(content: &ContentStatus) -> &'static str {
    match content {
        ContentStatus::Extracted => "extracted",
        ContentStatus::Unavailable { .. } => "unavailable",
    }
}

pub fn format_text(record: &AnalysisRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", record.filename));
    output.push_str(&format!(
        "Category: {} ({}%, {})\n",
        record.category,
        record.confidence,
        source_label(record.category_source)
    ));
    output.push_str(&format!("Company:  {}\n", record.company));
    if let Some(template) = &record.template {
        output.push_str(&format!("Template: {}\n", template));
    }
    output.push_str(&format!("Year:     {}\n", record.year));
    if !record.keywords.is_empty() {
        output.push_str(&format!("Keywords: {}\n", record.keywords.join(", ")));
    }
    if let ContentStatus::Unavailable { reason } = &record.content {
        output.push_str(&format!("Content:  unavailable ({}), classified by file name\n", reason));
    }

    let metadata = &record.metadata;
    if !metadata.is_empty() {
        output.push('\n');
        output.push_str("Metadata:\n");
        if let Some(amounts) = &metadata.amounts {
            let amounts: Vec<String> = amounts.iter().map(|a| format!("€ {a:.2}")).collect();
            output.push_str(&format!("  Amounts:  {}\n", amounts.join(", ")));
        }
        if let Some(total) = metadata.total_amount {
            output.push_str(&format!("  Total:    € {total:.2}\n"));
        }
        let ibans = metadata
            .bank_account_numbers
            .as_ref()
            .map(|ibans| ibans.iter().map(String::as_str).map(format_iban).collect::<Vec<_>>());
        let lists = [
            ("Dates", metadata.dates.as_ref()),
            ("Fiscal codes", metadata.fiscal_codes.as_ref()),
            ("IBAN", ibans.as_ref()),
            ("Protocol", metadata.protocol_numbers.as_ref()),
        ];
        for (label, values) in lists {
            if let Some(values) = values {
                output.push_str(&format!("  {}: {}\n", label, values.join(", ")));
            }
        }
    }

    if !record.extracted_values.is_empty() {
        output.push('\n');
        output.push_str("Template values:\n");
        for (name, value) in &record.extracted_values {
            output.push_str(&format!("  {}: {}\n", name, value));
        }
    }

    output
}
