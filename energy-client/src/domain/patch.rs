use serde::{Deserialize, Deserializer};

/// A single updatable field in a partial update.
///
/// `Keep` leaves the stored value untouched, `Set` replaces it. When
/// deserialized, an absent field (with `#[serde(default)]`) and an explicit
/// JSON `null` both become `Keep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    /// Resolve against the currently stored value.
    pub fn merge(self, current: T) -> T {
        match self {
            Patch::Keep => current,
            Patch::Set(value) => value,
        }
    }

    pub fn try_map<U, E, F>(self, f: F) -> Result<Patch<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        match self {
            Patch::Keep => Ok(Patch::Keep),
            Patch::Set(value) => f(value).map(Patch::Set),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Keep, Patch::Set)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        name: Patch<String>,
        #[serde(default)]
        capacity: Patch<f64>,
    }

    #[test]
    fn merge_keeps_current_value_unless_set() {
        assert_eq!(Patch::Keep.merge(5), 5);
        assert_eq!(Patch::Set(7).merge(5), 7);
    }

    #[test]
    fn absent_and_null_fields_deserialize_as_keep() {
        let body: Body = serde_json::from_str(r#"{"capacity": null}"#).unwrap();
        assert_eq!(body.name, Patch::Keep);
        assert_eq!(body.capacity, Patch::Keep);
    }

    #[test]
    fn present_fields_deserialize_as_set() {
        let body: Body = serde_json::from_str(r#"{"name": "Wind", "capacity": 0}"#).unwrap();
        assert_eq!(body.name, Patch::Set("Wind".to_string()));
        assert_eq!(body.capacity, Patch::Set(0.0));
    }

    #[test]
    fn try_map_only_runs_for_set_values() {
        let keep: Patch<&str> = Patch::Keep;
        let mapped: Result<Patch<i32>, String> = keep.try_map(|_| Err("never".to_string()));
        assert_eq!(mapped, Ok(Patch::Keep));

        let set = Patch::Set("12");
        let mapped: Result<Patch<i32>, std::num::ParseIntError> = set.try_map(str::parse);
        assert_eq!(mapped, Ok(Patch::Set(12)));
    }
}
