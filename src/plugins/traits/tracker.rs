/// Trait for turning extracted page text into a value worth reporting.
pub trait TrackerPlugin: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn plugin_type(&self) -> &str;
    fn description(&self) -> &str;

    /// Core functionality
    fn normalize(&self, text: &str) -> String;
}
