use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AnalyzeController, BulkController};

pub struct Router<'a> {
    analyze_controller: AnalyzeController<'a>,
    bulk_controller: BulkController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            analyze_controller: AnalyzeController::new(container),
            bulk_controller: BulkController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Analyze {
                message,
                customer_id,
                agent_id,
            } => {
                self.analyze_controller
                    .analyze(message, customer_id, agent_id)
                    .await
            }
            Commands::Bulk { file } => self.bulk_controller.bulk(&file).await,
            Commands::Serve { .. } => unreachable!("serve command is handled separately in main"),
        }
    }
}
