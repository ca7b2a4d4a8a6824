use super::available;
use super::types::PluginRecord;
use crate::env::EnvironmentProvider;

/// Installed plugins and registered MIME types, with their counts.
pub fn collect_plugins(env: &dyn EnvironmentProvider) -> PluginRecord {
    let plugins = available("navigator.plugins", env.plugins()).unwrap_or_default();
    let mime_types = available("navigator.mimeTypes", env.mime_types()).unwrap_or_default();

    PluginRecord {
        plugin_count: plugins.len(),
        mime_type_count: mime_types.len(),
        plugins,
        mime_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fixtures;

    #[test]
    fn test_plugin_counts() {
        let record = collect_plugins(&fixtures::desktop());
        assert_eq!(record.plugin_count, 1);
        assert_eq!(record.plugins[0].name, "PDF Viewer");
        assert_eq!(record.mime_type_count, 1);
        assert_eq!(record.mime_types[0].mime_type, "application/pdf");
    }

    #[test]
    fn test_mime_type_wire_name() {
        let record = collect_plugins(&fixtures::desktop());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mimeTypes"][0]["type"], "application/pdf");
        assert_eq!(json["pluginCount"], 1);
    }

    #[test]
    fn test_no_plugin_support() {
        let record = collect_plugins(&fixtures::bare());
        assert_eq!(record.plugin_count, 0);
        assert!(record.plugins.is_empty());
        assert!(record.mime_types.is_empty());
    }
}
