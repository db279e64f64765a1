//! Static data context — resolved once per request from the channel.

use serde_json::Value;

use transclude_core::{Channel, DataMap, EngineConfig, PagePath, StaticDataProvider};

/// Query `provider` once per configured data type.
///
/// The value is stored under the data-type key. The page-scoped type stores
/// `value[page_path]` instead of the whole value. Missing values are skipped.
pub fn build_static_data(
    provider: &dyn StaticDataProvider,
    config: &EngineConfig,
    channel: &Channel,
    page_path: &PagePath,
) -> DataMap {
    let page_scoped = config.page_scoped_key();
    let mut data = DataMap::new();

    for data_type in config.static_data_types.values() {
        let Some(setting) = provider.get(channel, data_type) else {
            tracing::debug!("no static '{}' for channel '{}'", data_type, channel);
            continue;
        };
        let value = if page_scoped == Some(data_type.as_str()) {
            match setting.get(page_path.as_str()) {
                Some(Value::Null) | None => continue,
                Some(per_page) => per_page.clone(),
            }
        } else {
            setting
        };
        data.insert(data_type.clone(), value);
    }
    data
}
