use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Query strings send empty values as `""`; treat those as absent.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Accepts a UUID, an empty string, or the literal `all` (no filter).
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Trims request strings before validation so length and pattern rules see
/// the value that gets stored.
pub fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

/// Optional counterpart of [`deserialize_trimmed`]. A blank value stays
/// `Some("")` so length rules still reject it; pair with `#[serde(default)]`.
pub fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.map(|s| s.trim().to_string()))
}

/// Trims an optional string and treats blank input as absent.
pub fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Distinguishes an explicit `null` from a missing field when used with
/// `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>`: missing is `None`, `null` is `Some(None)`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        class_id: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        age: Option<i64>,
    }

    #[test]
    fn test_all_means_no_filter() {
        let f: Filter = serde_json::from_str(r#"{"class_id":"all","age":""}"#).unwrap();
        assert!(f.class_id.is_none());
        assert!(f.age.is_none());
    }

    #[test]
    fn test_values_are_parsed() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"class_id":"{}","age":"7"}}"#, id);
        let f: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(f.class_id, Some(id));
        assert_eq!(f.age, Some(7));
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        teacher_id: Option<Option<Uuid>>,
    }

    #[test]
    fn test_deserialize_some_tri_state() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.teacher_id, None);

        let null: Patch = serde_json::from_str(r#"{"teacher_id":null}"#).unwrap();
        assert_eq!(null.teacher_id, Some(None));

        let id = Uuid::new_v4();
        let set: Patch = serde_json::from_str(&format!(r#"{{"teacher_id":"{}"}}"#, id)).unwrap();
        assert_eq!(set.teacher_id, Some(Some(id)));
    }

    #[derive(Deserialize)]
    struct Form {
        #[serde(deserialize_with = "deserialize_trimmed")]
        name: String,
        #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
        nickname: Option<String>,
        #[serde(default, deserialize_with = "deserialize_blank_as_none")]
        phone: Option<String>,
    }

    #[test]
    fn test_trimmed_strings() {
        let f: Form =
            serde_json::from_str(r#"{"name":"  Amina ","nickname":"   ","phone":"  "}"#).unwrap();
        assert_eq!(f.name, "Amina");
        assert_eq!(f.nickname.as_deref(), Some(""));
        assert_eq!(f.phone, None);

        let f: Form = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(f.nickname, None);
        assert_eq!(f.phone, None);
    }

    #[test]
    fn test_invalid_uuid_is_rejected() {
        assert!(serde_json::from_str::<Filter>(r#"{"class_id":"nope"}"#).is_err());
    }
}
