use contact_normalizer::config::toml_config::TomlConfig;
use contact_normalizer::core::Contact;
use contact_normalizer::{FixEngine, FixPipeline, LocalStorage, NormalizerError};
use std::path::Path;
use tempfile::TempDir;

fn config_for(output: &Path) -> anyhow::Result<TomlConfig> {
    let toml = format!(
        r#"
[normalizer]
default_country_prefix = "+1"

[load]
output_path = "{}"
output_formats = ["json", "csv"]
"#,
        output.display()
    );
    Ok(TomlConfig::from_toml_str(&toml)?)
}

#[tokio::test]
async fn test_end_to_end_fix_of_json_export() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("out");
    let contacts = serde_json::json!([
        {
            "id": "1:ABPerson",
            "firstName": "John",
            "lastName": "Doe",
            "phones": [{"number": "555 123 4567"}, {"number": "1 (555) 987-6543", "label": "work"}],
            "socials": [
                {"service": "Facebook", "username": "https://www.facebook.com/profile.php?id=100004"},
                {"service": "googleplus", "username": "jd"},
                {"service": "Twitter", "username": "JDoe", "url": "https://twitter.com/JDoe"},
                {"service": "Flickr", "username": "www.flickr.com", "url": "https://www.flickr.com/people/jdoe_photos"}
            ]
        }
    ]);
    std::fs::write(
        temp_dir.path().join("contacts.json"),
        serde_json::to_vec(&contacts)?,
    )?;

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = FixPipeline::new(storage, config_for(&output_dir)?, "contacts.json");
    let output = FixEngine::new(pipeline).run().await?;
    assert_eq!(Path::new(&output), output_dir);

    let fixed: Vec<Contact> =
        serde_json::from_slice(&std::fs::read(output_dir.join("fixed_contacts.json"))?)?;
    let john = &fixed[0];
    assert_eq!(john.phones[0].number, "+15551234567");
    assert_eq!(john.phones[1].number, "+15559876543");
    assert_eq!(john.socials.len(), 3);

    assert_eq!(
        john.socials[0].url.as_deref(),
        Some("https://www.facebook.com/profile.php?id=100004")
    );
    assert_eq!(john.socials[0].username, None);

    // case-sensitive url check forces a rebuild for the lowercased handle
    assert_eq!(john.socials[1].username.as_deref(), Some("jdoe"));
    assert_eq!(john.socials[1].url.as_deref(), Some("https://twitter.com/jdoe"));

    assert_eq!(john.socials[2].username.as_deref(), Some("jdoe_photos"));
    assert_eq!(
        john.socials[2].url.as_deref(),
        Some("https://www.flickr.com/people/jdoe_photos")
    );

    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output_dir.join("fix_report.json"))?)?;
    assert_eq!(report["contacts"], 1);
    assert_eq!(report["phones_normalized"], 2);
    assert_eq!(report["profiles"]["nullified"], 1);
    assert_eq!(report["profiles"]["rewritten"], 2);
    assert_eq!(report["profiles"]["preserved"], 1);
    assert!(report["generated_at"].is_string());

    let mut reader = csv::Reader::from_path(output_dir.join("repair_report.csv"))?;
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[1][1], "nullified");
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_fix_of_csv_export() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("out");
    std::fs::write(
        temp_dir.path().join("socials.csv"),
        "contact_id,service,username,url\n\
         7,LinkedIn,TYPE=PREF,https://www.linkedin.com/in/jane-roe\n\
         7,Instagram,TYPE=PREF,\n\
         8,X,Jack,\n",
    )?;

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = FixPipeline::new(storage, config_for(&output_dir)?, "socials.csv");
    FixEngine::new(pipeline).run().await?;

    let fixed: Vec<Contact> =
        serde_json::from_slice(&std::fs::read(output_dir.join("fixed_contacts.json"))?)?;
    assert_eq!(fixed.len(), 2);

    assert_eq!(fixed[0].socials.len(), 1);
    assert_eq!(fixed[0].socials[0].username.as_deref(), Some("jane-roe"));

    assert_eq!(fixed[1].socials[0].service.as_deref(), Some("Twitter"));
    assert_eq!(fixed[1].socials[0].url.as_deref(), Some("https://twitter.com/jack"));
    Ok(())
}

#[tokio::test]
async fn test_missing_input_is_a_system_error() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = FixPipeline::new(storage, config_for(temp_dir.path())?, "absent.json");

    let err = FixEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, NormalizerError::IoError(_)));
    assert_eq!(err.exit_code(), 3);
    Ok(())
}
