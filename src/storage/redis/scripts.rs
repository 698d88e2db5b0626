//! Lua scripts executed atomically on the server

use redis::Script;

/// Conditional hash update.
///
/// `KEYS[1]` is the alert hash. `ARGV[1]` is the number of fields to clear,
/// followed by those field names, followed by field/value pairs to set.
/// Nothing is written when the key is absent. Returns 1 when written.
const HASH_UPDATE_IF_EXISTS: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
local clear = tonumber(ARGV[1])
for i = 2, clear + 1 do
    redis.call('HDEL', KEYS[1], ARGV[i])
end
if #ARGV > clear + 1 then
    redis.call('HSET', KEYS[1], unpack(ARGV, clear + 2))
end
return 1
"#;

pub(super) fn hash_update_if_exists() -> Script {
    Script::new(HASH_UPDATE_IF_EXISTS)
}

/// Fields to remove and field/value pairs to write in one conditional update
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct HashUpdate {
    pub clear: Vec<&'static str>,
    pub set: Vec<(&'static str, String)>,
}

impl HashUpdate {
    pub fn set(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.set.push((field, value.into()));
        self
    }

    /// Set the field when `value` is present, otherwise clear it
    pub fn set_or_clear(self, field: &'static str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => self.set(field, v),
            None => {
                let mut update = self;
                update.clear.push(field);
                update
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clear.is_empty() && self.set.is_empty()
    }

    /// Flatten into the script's ARGV layout
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(1 + self.clear.len() + self.set.len() * 2);
        args.push(self.clear.len().to_string());
        args.extend(self.clear.iter().map(|f| f.to_string()));
        for (field, value) in &self.set {
            args.push(field.to_string());
            args.push(value.clone());
        }
        args
    }
}
