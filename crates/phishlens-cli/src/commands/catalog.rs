use phishlens_api_models::FeatureCatalog;

use crate::cli::OutputFormat;
use crate::client::CliResult;
use crate::output::print_catalog;

pub(crate) fn handle_catalog(format: OutputFormat) -> CliResult<()> {
    print_catalog(FeatureCatalog::standard(), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_catalog_prints_both_formats() {
        handle_catalog(OutputFormat::Table).expect("table output");
        handle_catalog(OutputFormat::Json).expect("json output");
    }
}
