use submitter_core::{ConfigError, ConfigField, SubmitterConfig};

fn configured() -> SubmitterConfig {
    SubmitterConfig {
        api_key: "0123456789abcdef".to_string(),
        site_url: "https://blog.example.org".to_string(),
        sitemap_url: "https://blog.example.org/sitemap.xml".to_string(),
    }
}

#[test]
fn defaults_report_api_key_first() {
    let err = SubmitterConfig::default().validate().unwrap_err();
    assert_eq!(err, ConfigError::Unset(ConfigField::ApiKey));
}

#[test]
fn placeholder_site_url_is_unset() {
    let config = SubmitterConfig {
        site_url: "https://yourdomain.com".to_string(),
        ..configured()
    };
    assert_eq!(
        config.validate().unwrap_err(),
        ConfigError::Unset(ConfigField::SiteUrl)
    );
}

#[test]
fn placeholder_sitemap_url_is_unset() {
    let config = SubmitterConfig {
        sitemap_url: "https://yourdomain.com/sitemap.xml".to_string(),
        ..configured()
    };
    let err = config.validate().unwrap_err();
    assert_eq!(err.field(), ConfigField::SitemapUrl);
    assert_eq!(err.to_string(), "sitemap_url has not been configured");
}

#[test]
fn relative_or_non_http_urls_are_invalid() {
    let relative = SubmitterConfig {
        sitemap_url: "/sitemap.xml".to_string(),
        ..configured()
    };
    assert!(matches!(
        relative.validate(),
        Err(ConfigError::Invalid {
            field: ConfigField::SitemapUrl,
            ..
        })
    ));

    let ftp = SubmitterConfig {
        site_url: "ftp://blog.example.org".to_string(),
        ..configured()
    };
    assert!(matches!(
        ftp.validate(),
        Err(ConfigError::Invalid {
            field: ConfigField::SiteUrl,
            ..
        })
    ));
}

#[test]
fn configured_values_pass() {
    assert_eq!(configured().validate(), Ok(()));
}
