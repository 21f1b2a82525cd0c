use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use const_format::concatcp;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::billing::ServiceLine;
use crate::error::ConfigError;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct PartyInfo {
    pub company: String,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PartyInfo {
    fn new(company: &str, address: &str, city: &str) -> Self {
        Self {
            company: company.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            phone: None,
            email: None,
            name: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct InvoiceMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct OutputPaths {
    pub invoice_dir: PathBuf,
    pub email_dir: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct EmailTemplates {
    pub recipient: String,
    pub sender: String,
    pub subject_template: String,
    pub body_template: String,
}

impl EmailTemplates {
    /// Templates paired with the name used for them in error messages
    pub fn templates(&self) -> [(&'static str, &str); 2] {
        [
            ("subject", self.subject_template.as_str()),
            ("body", self.body_template.as_str()),
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Config {
    pub sender: PartyInfo,
    pub receiver: PartyInfo,
    #[serde(default)]
    pub invoice: InvoiceMeta,
    pub services: Vec<ServiceLine>,
    pub output: OutputPaths,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailTemplates>,
}

const DEFAULT_BODY: &str = concatcp!(
    "Dear {client_name},\n\n",
    "I hope you are all well!\n\n",
    "Attached below is the invoice for {month} {year}. ",
    "Please let me know if you have any questions or concerns.\n\n",
    "All the best,\n",
    "{sender_name}",
);

impl Default for Config {
    fn default() -> Self {
        let sender = PartyInfo {
            phone: Some("Your Phone".to_string()),
            email: Some("your.email@example.com".to_string()),
            ..PartyInfo::new("Your Company", "Your Address", "Your City")
        };

        Self {
            sender,
            receiver: PartyInfo::new(
                "Client Company",
                "Client Address",
                "Client City",
            ),
            invoice: InvoiceMeta {
                number: Some("001".to_string()),
            },
            services: vec![ServiceLine::new(
                "Service Description",
                Decimal::ONE,
                Decimal::new(100000, 2),
            )],
            output: OutputPaths {
                invoice_dir: PathBuf::from("./invoices"),
                email_dir: PathBuf::from("./emails"),
            },
            email: Some(EmailTemplates {
                recipient: "client@example.com".to_string(),
                sender: "your.email@example.com".to_string(),
                subject_template: "Invoice for {month} {year}".to_string(),
                body_template: DEFAULT_BODY.to_string(),
            }),
        }
    }
}

impl Config {
    /// Checks the amounts before any file is touched
    pub fn validate(&self) -> Result<(), ConfigError> {
        let negative = |d: Decimal| d.is_sign_negative() && !d.is_zero();
        for service in self.services.iter() {
            if negative(service.quantity) || negative(service.unit_price.amount())
            {
                return Err(ConfigError::NegativeAmount {
                    description: service.description.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A configuration together with the file it belongs to. Saving always
/// writes back to that file.
#[derive(Debug, PartialEq, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    pub config: Config,
}

impl ConfigFile {
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    pub fn create_default(path: &Path) -> Result<Self, ConfigError> {
        let file = Self {
            path: path.to_path_buf(),
            config: Config::default(),
        };
        file.save()?;
        info!("Created default configuration at {}", path.display());
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| {
            ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Loaded configuration from {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Load `path`, creating it with defaults first when it is missing.
    /// The flag reports whether the file was created.
    pub fn open_or_create(path: &Path) -> Result<(Self, bool), ConfigError> {
        if Self::exists(path) {
            Ok((Self::load(path)?, false))
        } else {
            Ok((Self::create_default(path)?, true))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let mut json = serde_json::to_vec_pretty(&self.config)?;
        json.push(b'\n');
        write_atomically(&self.path, &json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

/// Write `contents` next to `path` and rename it into place, so readers
/// see either the old file or the new one.
/// The temporary file is removed again if any step fails.
pub fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let updated_path = path.with_extension("updated");
    let written = File::create(&updated_path).and_then(|mut f| {
        f.write_all(contents)?;
        f.sync_all()?;
        fs::rename(&updated_path, path)
    });
    if written.is_err() && updated_path.exists() {
        if let Err(e) = fs::remove_file(&updated_path) {
            warn!("Could not remove {}: {}", updated_path.display(), e);
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::Money;
    use const_format::formatcp;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    const SENDER_RAW: &str = r#""sender": {"company": "Biz", "address": "2 Ave", "city": "Gotham", "phone": "555", "email": "a@b.com"}"#;
    const RECEIVER_RAW: &str = r#""receiver": {"company": "Acme", "address": "1 Rd", "city": "Metropolis"}"#;
    const OUTPUT_RAW: &str = r#""output": {"invoice_dir": "inv", "email_dir": "mail"}"#;
    const SERVICES_RAW: &str = r#""services": [{"description": "Consulting", "quantity": 10, "unit_price": 50.00}]"#;

    const CONFIG_STR: &str = formatcp!(
        "{{{}, {}, \"invoice\": {{\"number\": \"005\"}}, {}, {}}}",
        SENDER_RAW,
        RECEIVER_RAW,
        SERVICES_RAW,
        OUTPUT_RAW
    );

    const NO_SERVICES_STR: &str = formatcp!(
        "{{{}, {}, \"invoice\": {{\"number\": \"005\"}}, {}}}",
        SENDER_RAW,
        RECEIVER_RAW,
        OUTPUT_RAW
    );

    const NO_INVOICE_STR: &str = formatcp!(
        "{{{}, {}, {}, {}}}",
        SENDER_RAW,
        RECEIVER_RAW,
        SERVICES_RAW,
        OUTPUT_RAW
    );

    #[test]
    fn deserialize() {
        let config: Config = serde_json::from_str(CONFIG_STR).unwrap();
        assert_eq!(config.sender.company, "Biz");
        assert_eq!(config.sender.phone.as_deref(), Some("555"));
        assert_eq!(config.receiver.phone, None);
        assert_eq!(config.receiver.name, None);
        assert_eq!(config.invoice.number.as_deref(), Some("005"));
        assert_eq!(config.services[0].quantity, dec!(10));
        assert_eq!(config.services[0].unit_price, Money::new(dec!(50)));
        assert_eq!(config.output.invoice_dir, PathBuf::from("inv"));
        assert_eq!(config.email, None);
    }

    #[test]
    fn missing_invoice_section_is_not_a_parse_error() {
        let config: Config = serde_json::from_str(NO_INVOICE_STR).unwrap();
        assert_eq!(config.invoice.number, None);
    }

    #[test]
    fn missing_services_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, NO_SERVICES_STR).unwrap();

        match ConfigFile::load(&path) {
            Err(ConfigError::Malformed { path: p, source }) => {
                assert_eq!(p, path);
                assert!(source.to_string().contains("services"));
            }
            other => panic!("expected malformed config, got {:?}", other),
        }
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(!ConfigFile::exists(&path));
        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigError::Io { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn create_default_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let (created, was_created) = ConfigFile::open_or_create(&path).unwrap();
        assert!(was_created);
        assert!(ConfigFile::exists(&path));

        let (loaded, was_created) = ConfigFile::open_or_create(&path).unwrap();
        assert!(!was_created);
        assert_eq!(loaded, created);
        assert_eq!(loaded.path(), path.as_path());
    }

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.sender.company, "Your Company");
        assert_eq!(config.sender.phone.as_deref(), Some("Your Phone"));
        assert_eq!(config.receiver.email, None);
        assert_eq!(config.receiver.name, None);
        assert_eq!(config.invoice.number.as_deref(), Some("001"));
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].unit_price, Money::new(dec!(1000.00)));
        assert_eq!(config.output.email_dir, PathBuf::from("./emails"));

        let email = config.email.unwrap();
        assert_eq!(email.subject_template, "Invoice for {month} {year}");
        assert!(email.body_template.starts_with("Dear {client_name},\n\n"));
        assert!(email.body_template.ends_with("All the best,\n{sender_name}"));
    }

    #[test]
    fn default_file_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        ConfigFile::create_default(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n  \"sender\": {\n    \"company\""));
        assert!(raw.contains("\"quantity\": 1,"));
        assert!(raw.contains("\"unit_price\": 1000.00\n"));
        assert!(!raw.contains("\"name\""));
        assert!(!path.with_extension("updated").exists());
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut config: Config = serde_json::from_str(CONFIG_STR).unwrap();
        config.services.push(ServiceLine::new("Refund", dec!(1), dec!(-20)));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeAmount { description }) if description == "Refund"
        ));

        config.services.pop();
        config.services.push(ServiceLine::new("Undo", dec!(-1), dec!(20)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn exact_amounts_survive_save() {
        const EXACT_STR: &str = formatcp!(
            "{{{}, {}, \"invoice\": {{\"number\": \"005\"}}, {}, {}}}",
            SENDER_RAW,
            RECEIVER_RAW,
            r#""services": [{"description": "Thirds", "quantity": 0.3333333333333333333, "unit_price": 9007199254740993}]"#,
            OUTPUT_RAW
        );
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, EXACT_STR).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        let service = &loaded.config.services[0];
        assert_eq!(service.quantity, dec!(0.3333333333333333333));
        assert_eq!(service.unit_price, Money::new(dec!(9007199254740993)));

        loaded.save().unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"quantity\": 0.3333333333333333333,"));
        assert!(raw.contains("\"unit_price\": 9007199254740993\n"));

        let reloaded = ConfigFile::load(&path).unwrap();
        assert_eq!(reloaded, loaded);
    }

    #[test]
    fn failed_write_leaves_no_temporary_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inside"), "keep").unwrap();

        assert!(write_atomically(&target, b"new contents").is_err());
        assert!(!target.with_extension("updated").exists());
        assert!(target.join("inside").exists());
    }
}
