#![allow(missing_docs)]

use anyhow::Result;
use tracing::{error, info};

use antenna_catalog_lib::CatalogUseCases;
use antenna_catalog_lib::infrastructure::logging::{init_logging_with_config, log_system_info};
use antenna_catalog_lib::infrastructure::ConfigManager;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = ConfigManager::new().load_config().await?;
    init_logging_with_config(&config.logging)?;
    log_system_info(&config.logging);

    let use_cases = CatalogUseCases::new(config);
    match use_cases.run().await {
        Ok(summary) => {
            info!("Categories written to {:?}", summary.categories_path);
            info!("Products written to {:?}", summary.products_path);
            Ok(())
        }
        Err(e) => {
            error!("❌ Catalog run failed: {:#}", e);
            Err(e)
        }
    }
}
