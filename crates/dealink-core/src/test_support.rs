use std::env::VarError;

use crate::{build_app_config, AppConfig, OutputMode, ProductRecord};

/// Config with every default applied and `https://deals.example.com` as base.
pub(crate) fn config(mode: OutputMode) -> AppConfig {
    let mut cfg = build_app_config(|key| match key {
        "DEALINK_PUBLIC_BASE_URL" => Ok("https://deals.example.com".to_owned()),
        "DEALINK_APP_STORE_URL" => Ok("https://apps.apple.com/app/id42".to_owned()),
        _ => Err(VarError::NotPresent),
    })
    .expect("test config should build");
    cfg.output_mode = mode;
    cfg
}

pub(crate) fn whey() -> ProductRecord {
    ProductRecord {
        supermarket: "Rewe".to_owned(),
        brand: "Optimum".to_owned(),
        name: "Whey".to_owned(),
        price: 19.99,
        old_price: None,
        category: "Protein".to_owned(),
        image_url: None,
    }
}
