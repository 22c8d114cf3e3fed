/// UseCase identification and documentation metadata
pub trait UseCaseMetadata {
    /// UseCase index (e.g. "u101")
    fn usecase_index() -> &'static str;

    /// Technical name (e.g. "bulk_import")
    fn usecase_name() -> &'static str;

    /// Display name for the UI (e.g. "Importação em Massa")
    fn display_name() -> &'static str;

    /// UseCase description
    fn description() -> &'static str {
        ""
    }

    /// Full name of the form "u101_bulk_import"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
