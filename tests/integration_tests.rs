#![cfg(feature = "cli")]

use anyhow::Result;
use clap::Parser;
use contact_directory::core::Pipeline;
use contact_directory::{
    CliConfig, DirectoryEngine, DirectoryPipeline, DirectoryStats, LocalStorage, TomlConfig,
};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "id,name,email,phone,department,country,company,follow_up,turnover_k";

fn write_source(dir: &TempDir, name: &str, rows: &[&str]) -> String {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');

    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_end_to_end_three_rows_one_duplicate() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_source(
        &temp_dir,
        "contacts.csv",
        &[
            "1,bob jones,Bob@Example.COM,+353 1 234-5678,R&D <Core>,Ireland,Acme,true,100",
            "2,Robert Jones,  bob@example.com ,,Sales,Ireland,Acme,false,300",
            "3,Ann Lee,ann@example.com,,Sales,France,Initech,false,50",
        ],
    );
    let output = temp_dir.path().join("out/contacts_directory.html");
    let output = output.to_str().unwrap();

    let config = CliConfig::parse_from(["contact-directory", source.as_str(), "--output", output]);
    let pipeline = DirectoryPipeline::new(LocalStorage::default(), config);
    let engine = DirectoryEngine::new(pipeline);

    let written = engine.run()?;
    assert_eq!(written, output);

    let html = fs::read_to_string(output)?;
    assert!(html.contains("<tr><td>Raw contacts loaded</td><td>3</td></tr>"));
    assert!(html.contains("<tr><td>Unique contacts</td><td>2</td></tr>"));
    assert!(html.contains("<tr><td>Duplicates removed</td><td>1</td></tr>"));
    assert!(html.contains("<tr><td>Contacts interested in follow-up</td><td>1</td></tr>"));
    assert!(html.contains("<td>150</td>"));

    // 第一筆保留，格式化欄位不跳脫，其他欄位跳脫
    assert!(html.contains("<span class=\"avatar\">BJ</span> bob <strong>jones</strong>"));
    assert!(html.contains("<a href=\"mailto:bob@example.com\">bob@example.com</a>"));
    assert!(html.contains("<td>R&amp;D &lt;Core&gt;</td>"));
    assert!(html.contains("<a href=\"tel:+35312345678\">"));
    assert!(!html.contains("Robert"));

    // 依部門排序: R&D 在 Sales 之前
    let rnd = html.find("R&amp;D").unwrap();
    let sales = html.find("<td>Sales</td>").unwrap();
    assert!(rnd < sales);

    Ok(())
}

#[test]
fn test_missing_source_does_not_block_others() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let hr = write_source(
        &temp_dir,
        "contacts_hr.csv",
        &["1,Ann Lee,ann@example.com,,HR,Ireland,Acme,true,10"],
    );
    let missing = temp_dir.path().join("contacts_it.csv");
    let sales = write_source(
        &temp_dir,
        "contacts_sales.csv",
        &[
            "2,Bob Jones,bob@example.com,,Sales,Ireland,Acme,false,20",
            "broken,row",
        ],
    );
    let output = temp_dir.path().join("directory.html");

    let config = CliConfig::parse_from([
        "contact-directory",
        hr.as_str(),
        missing.to_str().unwrap(),
        sales.as_str(),
        "-o",
        output.to_str().unwrap(),
    ]);
    let pipeline = DirectoryPipeline::new(LocalStorage::default(), config);

    let raw = pipeline.extract()?;
    assert_eq!(raw.len(), 2);

    let result = pipeline.transform(raw)?;
    assert_eq!(result.stats.unique_count, 2);
    assert_eq!(result.stats.total_turnover_k, 30);

    pipeline.load(result)?;
    assert!(output.exists());

    Ok(())
}

#[test]
fn test_no_inputs_produces_empty_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("empty.html");

    let config = CliConfig::parse_from(["contact-directory", "-o", output.to_str().unwrap()]);
    let engine = DirectoryEngine::new(DirectoryPipeline::new(LocalStorage::default(), config));

    engine.run()?;

    let html = fs::read_to_string(&output)?;
    assert!(html.contains("<tr><td>Raw contacts loaded</td><td>0</td></tr>"));
    assert!(html.contains("<tr><td>Duplicates removed</td><td>0</td></tr>"));

    Ok(())
}

#[test]
fn test_toml_config_with_exports() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_source(
        &temp_dir,
        "contacts_it.csv",
        &[
            "1,Cy Ng,cy@example.com,,IT,Spain,Initech,true,40",
            "2,Cy Ng,CY@example.com,,IT,Spain,Initech,true,40",
        ],
    );

    let toml_content = r#"
[directory]
title = "IT Contacts"

[source]
files = ["contacts_it.csv"]

[format]
steps = ["normalize", "email-link"]

[output]
html = "reports/it.html"
stats_json = "reports/stats.json"
export_csv = "reports/unique.csv"
"#;
    let config = TomlConfig::from_toml_str(toml_content)?;

    let storage = LocalStorage::new(temp_dir.path());
    let engine = DirectoryEngine::new(DirectoryPipeline::new(storage, config));
    let written = engine.run()?;
    assert_eq!(written, "reports/it.html");

    let reports = temp_dir.path().join("reports");
    let html = fs::read_to_string(reports.join("it.html"))?;
    assert!(html.contains("<h1>IT Contacts</h1>"));
    assert!(html.contains("<td>Cy Ng</td>"));
    assert!(!html.contains("avatar\">"));

    let stats: DirectoryStats = serde_json::from_str(&fs::read_to_string(reports.join("stats.json"))?)?;
    assert_eq!(stats.raw_count, 2);
    assert_eq!(stats.unique_count, 1);
    assert_eq!(stats.duplicate_count, 1);

    let exported = fs::read_to_string(reports.join("unique.csv"))?;
    assert_eq!(exported.lines().count(), 2);
    assert!(exported.starts_with(HEADER));

    Ok(())
}
