//! Persistence: best-time record and recent-player list.
//!
//! ## Files
//!
//!   **best_time.txt**: one line, `"<time:.2> by <name>"`.
//!
//!   **players.json**: JSON array of names, most recent first, at most
//!   `MAX_PLAYERS` entries.
//!
//! Loading never fails: a missing or unreadable file yields the default
//! value. Saving overwrites the whole file.

use std::path::{Path, PathBuf};

use log::debug;

/// Maximum number of names kept on disk.
pub const MAX_PLAYERS: usize = 5;

const BEST_TIME_FILE: &str = "best_time.txt";
const PLAYER_FILE: &str = "players.json";
const SEPARATOR: &str = " by ";

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Locations of the two data files.
#[derive(Clone, Debug)]
pub struct DataPaths {
    pub best_time: PathBuf,
    pub players: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: &Path) -> Self {
        DataPaths {
            best_time: dir.join(BEST_TIME_FILE),
            players: dir.join(PLAYER_FILE),
        }
    }
}

/// Directory for data and log files when the config doesn't name one.
pub fn default_data_dir() -> PathBuf {
    // 1. Exe directory, if writable (portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let test_path = parent.join(".write_test_paddle_survival");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/paddle-survival");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// Best time
// ══════════════════════════════════════════════════════════════

/// Longest survival time ever recorded, with the name of whoever set it.
#[derive(Clone, PartialEq, Debug)]
pub struct BestTimeRecord {
    pub time: f64,
    pub holder: String,
}

impl Default for BestTimeRecord {
    fn default() -> Self {
        BestTimeRecord { time: 0.0, holder: "None".to_string() }
    }
}

impl BestTimeRecord {
    /// Replace the record if `elapsed` strictly beats it.
    /// Returns true if the record changed.
    pub fn try_beat(&mut self, elapsed: f64, name: &str) -> bool {
        if elapsed > self.time {
            self.time = elapsed;
            self.holder = name.to_string();
            true
        } else {
            false
        }
    }
}

pub fn load_best_time(path: &Path) -> BestTimeRecord {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_best_time(&content).unwrap_or_else(|| {
            debug!("{} is malformed, using default record", path.display());
            BestTimeRecord::default()
        }),
        Err(_) => BestTimeRecord::default(),
    }
}

pub fn save_best_time(path: &Path, record: &BestTimeRecord) -> Result<(), String> {
    std::fs::write(path, format_best_time(record))
        .map_err(|e| format!("Saving best time to {} failed: {}", path.display(), e))
}

fn format_best_time(record: &BestTimeRecord) -> String {
    format!("{:.2}{}{}", record.time, SEPARATOR, record.holder)
}

/// `"12.34 by NAME"` → record. The name is everything after the first
/// separator, so names may themselves contain `" by "`.
fn parse_best_time(content: &str) -> Option<BestTimeRecord> {
    let content = content.trim_end_matches(['\r', '\n']);
    let (time, holder) = content.split_once(SEPARATOR)?;
    let time: f64 = time.trim().parse().ok()?;
    if !time.is_finite() || time < 0.0 {
        return None;
    }
    Some(BestTimeRecord { time, holder: holder.to_string() })
}

// ══════════════════════════════════════════════════════════════
// Player list
// ══════════════════════════════════════════════════════════════

/// Recently used names, most recent first, without duplicates.
///
/// May briefly hold more than `MAX_PLAYERS` names: the caller saves and then
/// calls `truncate_to_saved()`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PlayerList {
    names: Vec<String>,
}

impl PlayerList {
    pub fn new() -> Self {
        PlayerList { names: Vec::new() }
    }

    /// Build from raw names, keeping the first occurrence of each.
    pub fn from_names(raw: Vec<String>) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(raw.len());
        for name in raw {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        PlayerList { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Insert at the front unless already present. Returns true if inserted.
    pub fn add_if_absent(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.insert(0, name.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.names.len() {
            Some(self.names.remove(index))
        } else {
            None
        }
    }

    /// Drop everything past what the file keeps.
    pub fn truncate_to_saved(&mut self) {
        self.names.truncate(MAX_PLAYERS);
    }
}

pub fn load_player_list(path: &Path) -> PlayerList {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return PlayerList::new(),
    };
    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(names) => PlayerList::from_names(names),
        Err(e) => {
            debug!("{} is malformed ({}), starting with no players", path.display(), e);
            PlayerList::new()
        }
    }
}

pub fn save_player_list(path: &Path, list: &PlayerList) -> Result<(), String> {
    let kept = &list.names()[..list.len().min(MAX_PLAYERS)];
    let json = serde_json::to_string(kept)
        .map_err(|e| format!("Encoding player list failed: {}", e))?;
    std::fs::write(path, json)
        .map_err(|e| format!("Saving players to {} failed: {}", path.display(), e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Fresh, empty directory unique to this test run.
    pub(crate) fn scratch_dir() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join(format!("paddle-survival-test-{}-{}", std::process::id(), n));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── Best time ──

    #[test]
    fn best_time_missing_file_is_default() {
        let paths = DataPaths::in_dir(&scratch_dir());
        assert_eq!(load_best_time(&paths.best_time), BestTimeRecord::default());
        assert_eq!(BestTimeRecord::default().holder, "None");
        assert_eq!(BestTimeRecord::default().time, 0.0);
    }

    #[test]
    fn best_time_corrupt_file_is_default() {
        let paths = DataPaths::in_dir(&scratch_dir());
        for junk in ["", "garbage", "12.5", "abc by Bob", "by Bob", "nan by Bob", "-3 by Bob"] {
            std::fs::write(&paths.best_time, junk).unwrap();
            assert_eq!(load_best_time(&paths.best_time), BestTimeRecord::default(), "{junk:?}");
        }
    }

    #[test]
    fn best_time_file_format() {
        let paths = DataPaths::in_dir(&scratch_dir());
        let rec = BestTimeRecord { time: 12.0, holder: "ALICE".into() };
        save_best_time(&paths.best_time, &rec).unwrap();
        let text = std::fs::read_to_string(&paths.best_time).unwrap();
        assert_eq!(text, "12.00 by ALICE");
    }

    #[test]
    fn best_time_tolerates_trailing_newline() {
        let paths = DataPaths::in_dir(&scratch_dir());
        std::fs::write(&paths.best_time, "7.25 by BOB\n").unwrap();
        let rec = load_best_time(&paths.best_time);
        assert_eq!(rec.time, 7.25);
        assert_eq!(rec.holder, "BOB");
    }

    #[test]
    fn holder_may_contain_separator() {
        let paths = DataPaths::in_dir(&scratch_dir());
        let rec = BestTimeRecord { time: 3.5, holder: "STAND BY ME".into() };
        save_best_time(&paths.best_time, &rec).unwrap();
        assert_eq!(load_best_time(&paths.best_time), rec);

        std::fs::write(&paths.best_time, "3.50 by A by B").unwrap();
        assert_eq!(load_best_time(&paths.best_time).holder, "A by B");
    }

    #[test]
    fn try_beat_needs_strictly_greater() {
        let mut rec = BestTimeRecord { time: 10.0, holder: "BOB".into() };
        assert!(!rec.try_beat(10.0, "ALICE"));
        assert!(!rec.try_beat(9.0, "ALICE"));
        assert_eq!(rec.holder, "BOB");
        assert!(rec.try_beat(12.0, "ALICE"));
        assert_eq!(rec, BestTimeRecord { time: 12.0, holder: "ALICE".into() });
    }

    // ── Player list ──

    #[test]
    fn players_missing_or_malformed_is_empty() {
        let paths = DataPaths::in_dir(&scratch_dir());
        assert!(load_player_list(&paths.players).is_empty());
        for junk in ["", "[", "{\"a\": 1}", "[1, 2]", "not json"] {
            std::fs::write(&paths.players, junk).unwrap();
            assert!(load_player_list(&paths.players).is_empty(), "{junk:?}");
        }
    }

    #[test]
    fn players_save_keeps_first_five() {
        let paths = DataPaths::in_dir(&scratch_dir());
        let mut list = PlayerList::new();
        for name in ["A", "B", "C", "D", "E", "F"] {
            list.add_if_absent(name);
        }
        assert_eq!(list.len(), 6);
        save_player_list(&paths.players, &list).unwrap();
        let text = std::fs::read_to_string(&paths.players).unwrap();
        assert_eq!(text, r#"["F","E","D","C","B"]"#);
        assert_eq!(load_player_list(&paths.players).names(), ["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn players_load_drops_duplicates() {
        let paths = DataPaths::in_dir(&scratch_dir());
        std::fs::write(&paths.players, r#"["A","B","A","C"]"#).unwrap();
        assert_eq!(load_player_list(&paths.players).names(), ["A", "B", "C"]);
    }

    #[test]
    fn add_if_absent_inserts_at_front_once() {
        let mut list = PlayerList::from_names(vec!["A".into(), "B".into()]);
        assert!(list.add_if_absent("C"));
        assert!(!list.add_if_absent("A"));
        assert_eq!(list.names(), ["C", "A", "B"]);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut list = PlayerList::from_names(vec!["A".into()]);
        assert_eq!(list.remove(3), None);
        assert_eq!(list.remove(0), Some("A".to_string()));
        assert!(list.is_empty());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(String),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[A-E]{1,2}".prop_map(Op::Add),
            (0usize..7).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn best_time_round_trips(time in 0.0f64..100_000.0, name in "[A-Z ]{1,15}") {
            let paths = DataPaths::in_dir(&scratch_dir());
            let rec = BestTimeRecord { time, holder: name.clone() };
            save_best_time(&paths.best_time, &rec).unwrap();
            let back = load_best_time(&paths.best_time);
            prop_assert_eq!(back.holder, name);
            prop_assert_eq!(format!("{:.2}", back.time), format!("{:.2}", time));
        }

        #[test]
        fn persisted_list_is_bounded_and_unique(ops in prop::collection::vec(op(), 0..40)) {
            let paths = DataPaths::in_dir(&scratch_dir());
            let mut list = PlayerList::new();
            for op in ops {
                match op {
                    Op::Add(name) => { list.add_if_absent(&name); }
                    Op::Remove(i) => { list.remove(i); }
                }
                save_player_list(&paths.players, &list).unwrap();
                list.truncate_to_saved();

                let on_disk = load_player_list(&paths.players);
                prop_assert!(on_disk.len() <= MAX_PLAYERS);
                let raw: Vec<String> =
                    serde_json::from_str(&std::fs::read_to_string(&paths.players).unwrap()).unwrap();
                let mut dedup = raw.clone();
                dedup.sort();
                dedup.dedup();
                prop_assert_eq!(dedup.len(), raw.len());
                prop_assert_eq!(on_disk.names(), list.names());
            }
        }
    }
}
