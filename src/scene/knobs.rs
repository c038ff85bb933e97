//! Generic knob (parameter) storage shared by nodes and the scene root.
//!
//! Knobs are string-keyed typed values. Insertion order is preserved so a
//! saved scene serializes deterministically.
//! Hashing notes:
//! - `hash_all()` hashes keys in sorted order for determinism.
//! - `KnobValue` hashes floats via `to_bits`; vectors are flattened.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Typed knob value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KnobValue {
    Bool(bool),
    Str(String),
    Int(i32),
    Float(f32),
    Double(f64),
    Vec2([f32; 2]),
}

impl Hash for KnobValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use KnobValue::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Bool(v) => v.hash(state),
            Str(v) => v.hash(state),
            Int(v) => v.hash(state),
            Float(v) => v.to_bits().hash(state),
            Double(v) => v.to_bits().hash(state),
            Vec2(arr) => arr.iter().for_each(|f| f.to_bits().hash(state)),
        }
    }
}

/// Knob container: string key → typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Knobs {
    #[serde(default)]
    map: IndexMap<String, KnobValue>,
}

impl Knobs {
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: KnobValue) {
        self.map.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&KnobValue> {
        self.map.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.map.get(key) {
            Some(KnobValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_i32(&self, key: &str) -> Option<i32> {
        match self.map.get(key) {
            Some(KnobValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.map.get(key) {
            Some(KnobValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        match self.map.get(key) {
            Some(KnobValue::Double(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.map.get(key) {
            Some(KnobValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get bool value with custom default
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Get i32 value with custom default
    pub fn get_i32_or(&self, key: &str, default: i32) -> i32 {
        self.get_i32(key).unwrap_or(default)
    }

    /// Remove knob by key
    pub fn remove(&mut self, key: &str) -> Option<KnobValue> {
        self.map.shift_remove(key)
    }

    /// Iterate over all knobs (key, value)
    pub fn iter(&self) -> impl Iterator<Item = (&String, &KnobValue)> {
        self.map.iter()
    }

    /// Check if knob exists
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Overlay all knobs from `other` onto self, replacing existing values.
    /// Used when instance values are pasted over definition defaults.
    pub fn overlay(&mut self, other: &Knobs) {
        for (key, value) in other.iter() {
            self.map.insert(key.clone(), value.clone());
        }
    }

    /// Hash all knobs. Keys are processed in sorted order so the result
    /// does not depend on insertion order.
    pub fn hash_all(&self) -> u64 {
        let mut keys: Vec<&String> = self.map.keys().collect();
        keys.sort_unstable();

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for key in keys {
            key.hash(&mut hasher);
            if let Some(value) = self.map.get(key) {
                value.hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}
