use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Score threshold above which a payload is classified as an attack.
/// Fixed by contract; `score == 0.7` is still `normal`.
pub const ATTACK_THRESHOLD: f64 = 0.7;

/// Synthetic attack-type vocabulary used by the traffic generator and the
/// seed batch. Arabic labels the dashboard renders directly; the durable
/// log must preserve them as UTF-8.
pub const ATTACK_TYPES: [&str; 5] = [
    "حجب الخدمة", // DDoS
    "حقن SQL",
    "XSS",
    "محاولات تسجيل دخول",
    "آخرون",
];

/// Vocabulary the synthetic path draws `topAttack` from. Deliberately
/// distinct from the scored path, which always reports `"AI"`.
pub const SIM_TOP_ATTACKS: [&str; 4] = ["SQLi", "XSS", "DDoS", "Brute Force"];

/// Placeholder model keys (`model1`..`model12`). POSTs to these always use
/// the random-fallback scorer; they are never a 404.
pub fn placeholder_keys() -> Vec<String> {
    (1..=12).map(|i| format!("model{i}")).collect()
}

/// Alert severity level.
///
/// # Examples
///
/// ```
/// use vigil_common::types::Level;
///
/// let level: Level = "high".parse().unwrap();
/// assert_eq!(level, Level::High);
/// assert_eq!(level.to_string(), "high");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::High => write!(f, "high"),
            Level::Medium => write!(f, "medium"),
            Level::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Level::High),
            "medium" => Ok(Level::Medium),
            "low" => Ok(Level::Low),
            _ => Err(format!("unknown level: {s}")),
        }
    }
}

/// Classification verdict for a scored payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Attack,
    Normal,
}

impl Label {
    /// Applies the fixed classification rule: strictly greater than the
    /// threshold is an attack, the boundary value is normal.
    pub fn from_score(score: f64) -> Self {
        if score > ATTACK_THRESHOLD {
            Label::Attack
        } else {
            Label::Normal
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Attack => write!(f, "attack"),
            Label::Normal => write!(f, "normal"),
        }
    }
}

/// One ingested or synthesized security-event observation.
///
/// Immutable once created; referenced by the in-memory store and the
/// durable log, never mutated. `id` is drawn from a small random range and
/// is not unique by contract.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertRecord {
    pub id: u32,
    /// The model key that scored this payload, or the synthetic attack-type
    /// label for generated records.
    pub model_or_attack: String,
    pub message: String,
    /// Reporting source: an IP-like identifier or the literal `"device"`.
    pub source: String,
    /// UTC, minute resolution, `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    pub level: Level,
}

impl AlertRecord {
    /// Builds the record emitted by the scoring gateway after classifying
    /// a payload.
    pub fn scored(model_key: &str, score: f64, label: Label, source: &str) -> Self {
        Self {
            id: random_alert_id(),
            model_or_attack: model_key.to_string(),
            message: format!("{label} (p={score}) from {model_key}"),
            source: source.to_string(),
            timestamp: minute_timestamp(Utc::now()),
            level: if label == Label::Attack {
                Level::High
            } else {
                Level::Low
            },
        }
    }

    /// Builds a synthetic record for the background generator and the
    /// seed batch.
    pub fn synthetic() -> Self {
        let mut rng = rand::thread_rng();
        let attack = ATTACK_TYPES[rng.gen_range(0..ATTACK_TYPES.len())];
        let level = match rng.gen_range(0..3) {
            0 => Level::High,
            1 => Level::Medium,
            _ => Level::Low,
        };
        Self {
            id: random_alert_id(),
            model_or_attack: attack.to_string(),
            message: format!("{attack} – حدثت محاولة هجوم"),
            source: format!("192.168.1.{}", rng.gen_range(1..255)),
            timestamp: minute_timestamp(Utc::now()),
            level,
        }
    }
}

/// Rolling dashboard statistics. A best-effort running tally, not an exact
/// aggregate of the stored alerts; field names match the dashboard wire
/// format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RollingStats {
    #[serde(rename = "todayAttempts")]
    pub today_attempts: u64,
    #[serde(rename = "topAttack")]
    pub top_attack: String,
    #[serde(rename = "successRate")]
    pub success_rate: u8,
    /// Always present on the wire; this pipeline never populates it.
    #[serde(rename = "dailyTrends")]
    pub daily_trends: Vec<serde_json::Value>,
}

/// Formats a timestamp at minute resolution, UTC.
pub fn minute_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn random_alert_id() -> u32 {
    rand::thread_rng().gen_range(1000..=9999)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_threshold_boundary_is_normal() {
        assert_eq!(Label::from_score(0.7), Label::Normal);
        assert_eq!(Label::from_score(0.700001), Label::Attack);
        assert_eq!(Label::from_score(0.0), Label::Normal);
        assert_eq!(Label::from_score(1.0), Label::Attack);
    }

    #[test]
    fn level_parses_and_displays() {
        for s in ["high", "medium", "low"] {
            let level: Level = s.parse().unwrap();
            assert_eq!(level.to_string(), s);
        }
        assert!("critical".parse::<Level>().is_err());
    }

    #[test]
    fn scored_record_fields() {
        let rec = AlertRecord::scored("model3", 0.91, Label::Attack, "10.0.0.9");
        assert_eq!(rec.model_or_attack, "model3");
        assert_eq!(rec.level, Level::High);
        assert_eq!(rec.source, "10.0.0.9");
        assert!(rec.message.contains("attack"));
        assert!(rec.message.contains("model3"));
        assert!((1000..=9999).contains(&rec.id));

        let rec = AlertRecord::scored("model3", 0.2, Label::Normal, "device");
        assert_eq!(rec.level, Level::Low);
    }

    #[test]
    fn synthetic_record_is_complete() {
        let rec = AlertRecord::synthetic();
        assert!(ATTACK_TYPES.contains(&rec.model_or_attack.as_str()));
        assert!(!rec.message.is_empty());
        assert!(rec.source.starts_with("192.168.1."));
        // minute resolution: "YYYY-MM-DD HH:MM"
        assert_eq!(rec.timestamp.len(), 16);
    }

    #[test]
    fn record_roundtrips_through_json() {
        let rec = AlertRecord::synthetic();
        let line = serde_json::to_string(&rec).unwrap();
        let back: AlertRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back.model_or_attack, rec.model_or_attack);
        assert_eq!(back.level, rec.level);
    }

    #[test]
    fn stats_serialize_with_wire_names() {
        let stats = RollingStats {
            today_attempts: 3,
            top_attack: "SQLi".to_string(),
            success_rate: 80,
            daily_trends: vec![],
        };
        let v = serde_json::to_value(&stats).unwrap();
        assert_eq!(v["todayAttempts"], 3);
        assert_eq!(v["topAttack"], "SQLi");
        assert_eq!(v["successRate"], 80);
        assert!(v["dailyTrends"].as_array().unwrap().is_empty());
    }

    #[test]
    fn placeholder_keys_are_ordered() {
        let keys = placeholder_keys();
        assert_eq!(keys.len(), 12);
        assert_eq!(keys[0], "model1");
        assert_eq!(keys[11], "model12");
    }
}
