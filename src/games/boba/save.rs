//! Boba Focus セーブデータ形式とストレージバックエンド。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! v1 はアップグレードレベルを `tapiocaUpgrades` などのフラットなフィールドで
//! 持っていた。v2 で `upgradeLevels` マップに移行した。エンベロープを持たない
//! ブラウザ版の生データ (`{ "bobaCount": ..., ... }`) も読み込める。
//!
//! 読み込みはフィールド単位で寛容: 型が違う・非有限・負の値はそのフィールドだけ
//! デフォルトに戻し、ロード全体を失敗させない。

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::config::INITIAL_GOAL;
use super::economy::recompute_rates;
use super::error::PersistError;
use super::state::{ProgressSnapshot, UpgradeId};

/// セーブデータのフォーマットバージョン。
pub const SAVE_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    progress: ProgressSave,
}

/// Wire form of [`ProgressSnapshot`]. Field names match the browser app.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ProgressSave {
    #[serde(rename = "bobaCount", deserialize_with = "lenient_amount")]
    currency: f64,
    #[serde(rename = "totalBoba", deserialize_with = "lenient_amount")]
    total_earned: f64,
    #[serde(rename = "totalClicks", deserialize_with = "lenient_count")]
    total_clicks: u64,
    #[serde(rename = "completedSessions", deserialize_with = "lenient_count")]
    completed_sessions: u64,
    #[serde(rename = "bobaGoal", deserialize_with = "lenient_amount")]
    current_goal: f64,
    #[serde(rename = "bobaPerClick", deserialize_with = "lenient_amount")]
    per_click_rate: f64,
    #[serde(rename = "passiveBobaRate", deserialize_with = "lenient_amount")]
    passive_rate: f64,
    #[serde(
        rename = "upgradeLevels",
        deserialize_with = "lenient_levels",
        skip_serializing_if = "Option::is_none"
    )]
    upgrade_levels: Option<BTreeMap<String, u32>>,
    #[serde(rename = "challengesCompleted", deserialize_with = "lenient_ids")]
    completed_challenge_ids: Vec<String>,

    // v1 / ブラウザ版のフラットなレベル。書き出しはしない。
    #[serde(rename = "tapiocaUpgrades", deserialize_with = "lenient", skip_serializing)]
    tapioca_upgrades: Option<u32>,
    #[serde(rename = "staffUpgrades", deserialize_with = "lenient", skip_serializing)]
    staff_upgrades: Option<u32>,
    #[serde(rename = "marketingUpgrades", deserialize_with = "lenient", skip_serializing)]
    marketing_upgrades: Option<u32>,
}

impl Default for ProgressSave {
    fn default() -> Self {
        let fresh = ProgressSnapshot::new();
        Self {
            currency: fresh.currency,
            total_earned: fresh.total_earned,
            total_clicks: fresh.total_clicks,
            completed_sessions: fresh.completed_sessions,
            current_goal: fresh.current_goal,
            per_click_rate: fresh.per_click_rate,
            passive_rate: fresh.passive_rate,
            upgrade_levels: None,
            completed_challenge_ids: Vec::new(),
            tapioca_upgrades: None,
            staff_upgrades: None,
            marketing_upgrades: None,
        }
    }
}

// ── Lenient field decoders ──────────────────────────────────────

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn amount_of(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite() && *n >= 0.0)
}

/// JS numbers may arrive as `12.0`; accept any finite non-negative value.
fn count_of(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| amount_of(value).map(|n| n.floor() as u64))
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(amount_of(&value).unwrap_or_default())
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(count_of(&value).unwrap_or_default())
}

/// Keeps every entry whose value is a usable level; ids are checked later.
fn lenient_levels<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(None);
    };
    let levels = map
        .iter()
        .filter_map(|(key, v)| {
            let level = u32::try_from(count_of(v)?).ok()?;
            Some((key.clone(), level))
        })
        .collect();
    Ok(Some(levels))
}

fn lenient_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let ids = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    Ok(ids)
}

// ── Snapshot <-> wire ───────────────────────────────────────────

fn extract_save(s: &ProgressSnapshot) -> ProgressSave {
    ProgressSave {
        currency: s.currency,
        total_earned: s.total_earned,
        total_clicks: s.total_clicks,
        completed_sessions: s.completed_sessions,
        current_goal: s.current_goal,
        per_click_rate: s.per_click_rate,
        passive_rate: s.passive_rate,
        upgrade_levels: Some(
            UpgradeId::all()
                .iter()
                .map(|id| (id.key().to_string(), s.level(*id)))
                .collect(),
        ),
        completed_challenge_ids: s.completed_challenge_ids.iter().cloned().collect(),
        tapioca_upgrades: None,
        staff_upgrades: None,
        marketing_upgrades: None,
    }
}

fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

/// セーブデータから ProgressSnapshot を復元する。
/// 不明なアップグレード ID は無視し、レートはレベルから再計算する。
fn apply_save(save: &ProgressSave) -> ProgressSnapshot {
    let mut s = ProgressSnapshot::new();
    s.currency = sanitize(save.currency, 0.0);
    s.total_earned = sanitize(save.total_earned, 0.0);
    s.total_clicks = save.total_clicks;
    s.completed_sessions = save.completed_sessions;
    s.current_goal = sanitize(save.current_goal, INITIAL_GOAL).max(INITIAL_GOAL);

    match &save.upgrade_levels {
        Some(levels) => {
            for (key, level) in levels {
                if let Some(id) = UpgradeId::from_key(key) {
                    s.upgrade_levels.insert(id, *level);
                }
            }
        }
        None => {
            let legacy = [
                (UpgradeId::Tapioca, save.tapioca_upgrades),
                (UpgradeId::Staff, save.staff_upgrades),
                (UpgradeId::Marketing, save.marketing_upgrades),
            ];
            for (id, level) in legacy {
                if let Some(level) = level {
                    s.upgrade_levels.insert(id, level);
                }
            }
        }
    }
    for id in UpgradeId::all() {
        let level = s.level(*id).max(id.starting_level());
        s.upgrade_levels.insert(*id, level);
    }

    s.completed_challenge_ids = save.completed_challenge_ids.iter().cloned().collect();
    recompute_rates(&mut s);
    s
}

/// Serialize a snapshot into the versioned envelope.
pub fn encode(s: &ProgressSnapshot) -> Result<String, PersistError> {
    let data = SaveData {
        version: SAVE_VERSION,
        progress: extract_save(s),
    };
    Ok(serde_json::to_string(&data)?)
}

/// Result of reading a stored document.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    /// `version` is `None` for a bare snapshot without the envelope.
    Snapshot {
        snapshot: ProgressSnapshot,
        version: Option<u32>,
    },
    /// Unreadable or too old; the caller starts fresh.
    Discard(String),
}

pub fn decode(json: &str) -> Decoded {
    let value: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => return Decoded::Discard(format!("unparseable save: {e}")),
    };
    let Value::Object(mut map) = value else {
        return Decoded::Discard("save is not a JSON object".to_string());
    };

    let (progress, version) = match map.remove("progress") {
        Some(progress) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0);
            if version < MIN_COMPATIBLE_VERSION {
                return Decoded::Discard(format!(
                    "save version too old (saved={}, min_compatible={})",
                    version, MIN_COMPATIBLE_VERSION
                ));
            }
            (progress, Some(version))
        }
        None => (Value::Object(map), None),
    };

    let save: ProgressSave = serde_json::from_value(progress).unwrap_or_default();
    Decoded::Snapshot {
        snapshot: apply_save(&save),
        version,
    }
}

/// RFC 3339 timestamp (millisecond precision, `Z`) for remote documents.
pub fn timestamp(now_ms: f64) -> String {
    DateTime::from_timestamp_millis(now_ms as i64)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

// ── Local backend ───────────────────────────────────────────────

/// String key-value store.
pub trait LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// localStorage にアクセスする。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct WebLocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl WebLocalStorage {
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalStore for WebLocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.storage
            .remove_item(key)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }
}

/// In-memory store. Used when localStorage is unavailable (private mode)
/// and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    /// When set, every write fails with `StorageUnavailable`.
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.fail_writes {
            return Err(PersistError::StorageUnavailable);
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.items.remove(key);
        Ok(())
    }
}

// ── Remote backend ──────────────────────────────────────────────

/// One user's document in the remote store.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteDocument {
    pub id: String,
    pub user_id: String,
    /// Encoded progress, as produced by [`encode`].
    pub data: String,
    pub timestamp: String,
}

/// Document store keyed by user id.
pub trait RemoteStore {
    fn find_by_user(&mut self, user_id: &str) -> Result<Option<RemoteDocument>, PersistError>;
    fn create(
        &mut self,
        user_id: &str,
        data: &str,
        timestamp: &str,
    ) -> Result<RemoteDocument, PersistError>;
    fn update(&mut self, document_id: &str, data: &str, timestamp: &str)
        -> Result<(), PersistError>;

    fn exists(&mut self, user_id: &str) -> Result<bool, PersistError> {
        Ok(self.find_by_user(user_id)?.is_some())
    }
}

#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryRemoteStore {
    pub documents: Vec<RemoteDocument>,
    pub writes: usize,
    pub fail: bool,
}

#[cfg(test)]
impl RemoteStore for MemoryRemoteStore {
    fn find_by_user(&mut self, user_id: &str) -> Result<Option<RemoteDocument>, PersistError> {
        if self.fail {
            return Err(PersistError::Remote("offline".into()));
        }
        Ok(self.documents.iter().find(|d| d.user_id == user_id).cloned())
    }

    fn create(
        &mut self,
        user_id: &str,
        data: &str,
        timestamp: &str,
    ) -> Result<RemoteDocument, PersistError> {
        if self.fail {
            return Err(PersistError::Remote("offline".into()));
        }
        let doc = RemoteDocument {
            id: format!("doc-{}", self.documents.len() + 1),
            user_id: user_id.to_string(),
            data: data.to_string(),
            timestamp: timestamp.to_string(),
        };
        self.documents.push(doc.clone());
        self.writes += 1;
        Ok(doc)
    }

    fn update(
        &mut self,
        document_id: &str,
        data: &str,
        timestamp: &str,
    ) -> Result<(), PersistError> {
        if self.fail {
            return Err(PersistError::Remote("offline".into()));
        }
        let doc = self
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| PersistError::Remote(format!("no document {document_id}")))?;
        doc.data = data.to_string();
        doc.timestamp = timestamp.to_string();
        self.writes += 1;
        Ok(())
    }
}

/// Lets a test keep a handle on the store it hands to the game.
#[cfg(test)]
impl RemoteStore for std::rc::Rc<std::cell::RefCell<MemoryRemoteStore>> {
    fn find_by_user(&mut self, user_id: &str) -> Result<Option<RemoteDocument>, PersistError> {
        self.borrow_mut().find_by_user(user_id)
    }

    fn create(
        &mut self,
        user_id: &str,
        data: &str,
        timestamp: &str,
    ) -> Result<RemoteDocument, PersistError> {
        self.borrow_mut().create(user_id, data, timestamp)
    }

    fn update(&mut self, document_id: &str, data: &str, timestamp: &str) -> Result<(), PersistError> {
        self.borrow_mut().update(document_id, data, timestamp)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_amount() -> impl Strategy<Value = f64> {
        prop_oneof![0.0f64..1e6, 0.0f64..1e15, Just(0.0)]
    }

    proptest! {
        #[test]
        fn prop_save_load_roundtrip(
            currency in arb_amount(),
            earned in arb_amount(),
            clicks in 0u64..1_000_000,
            sessions in 0u64..10_000,
            goal_steps in 0u32..8,
            tapioca in 1u32..40,
            staff in 0u32..40,
            marketing in 0u32..40,
            ids in proptest::collection::btree_set("[a-z]{1,8}", 0..6),
        ) {
            let mut s = ProgressSnapshot::new();
            s.currency = currency;
            s.total_earned = earned;
            s.total_clicks = clicks;
            s.completed_sessions = sessions;
            s.current_goal = INITIAL_GOAL * 5f64.powi(goal_steps as i32);
            s.upgrade_levels.insert(UpgradeId::Tapioca, tapioca);
            s.upgrade_levels.insert(UpgradeId::Staff, staff);
            s.upgrade_levels.insert(UpgradeId::Marketing, marketing);
            s.completed_challenge_ids = ids;
            recompute_rates(&mut s);

            let json = encode(&s).unwrap();
            match decode(&json) {
                Decoded::Snapshot { snapshot, .. } => prop_assert_eq!(snapshot, s),
                Decoded::Discard(reason) => prop_assert!(false, "discarded: {}", reason),
            }
        }
    }
}
