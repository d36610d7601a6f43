//! Configuration loading and parsing.
//!
//! `pilot.toml` is looked up in the working directory, then in the platform
//! config directory (`<config_dir>/pilot/pilot.toml`). A missing file means
//! defaults; a file that fails to parse is logged and also means defaults, so
//! a typo never keeps the editor from starting. Unknown fields are ignored.
//!
//! ```toml
//! [editor]
//! word_delimiters = ";:,.[]{}()/\\|^&*-=+'\"–—―"
//! maximum_kill_ring_count = 10
//! continuation_prompt = ">> "
//! bell = "audible"
//!
//! [stream]
//! refresh_interval_ms = 50
//! whole_line_interval_ms = 20
//!
//! [keys]
//! "Ctrl+k" = "kill-line"
//! ```

use std::collections::BTreeMap;
use std::{fs, path::PathBuf};

use anyhow::Result;
use core_keymap::Keymap;
use core_render::Throttle;
use core_state::{BellStyle, EditorOptions};
use serde::Deserialize;
use tracing::{info, warn};

const FILE_NAME: &str = "pilot.toml";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BellConfig {
    #[default]
    Audible,
    Visual,
    None,
}

impl From<BellConfig> for BellStyle {
    fn from(b: BellConfig) -> Self {
        match b {
            BellConfig::Audible => BellStyle::Audible,
            BellConfig::Visual => BellStyle::Visual,
            BellConfig::None => BellStyle::None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_word_delimiters")]
    pub word_delimiters: String,
    #[serde(default = "EditorConfig::default_kill_ring_count")]
    pub maximum_kill_ring_count: usize,
    #[serde(default = "EditorConfig::default_continuation_prompt")]
    pub continuation_prompt: String,
    #[serde(default)]
    pub bell: BellConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            word_delimiters: Self::default_word_delimiters(),
            maximum_kill_ring_count: Self::default_kill_ring_count(),
            continuation_prompt: Self::default_continuation_prompt(),
            bell: BellConfig::default(),
        }
    }
}

impl EditorConfig {
    fn default_word_delimiters() -> String {
        EditorOptions::default().word_delimiters
    }
    fn default_kill_ring_count() -> usize {
        EditorOptions::default().maximum_kill_ring_count
    }
    fn default_continuation_prompt() -> String {
        EditorOptions::default().continuation_prompt
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    #[serde(default = "StreamConfig::default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "StreamConfig::default_whole_line_interval_ms")]
    pub whole_line_interval_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: Self::default_refresh_interval_ms(),
            whole_line_interval_ms: Self::default_whole_line_interval_ms(),
        }
    }
}

impl StreamConfig {
    const fn default_refresh_interval_ms() -> u64 {
        50
    }
    const fn default_whole_line_interval_ms() -> u64 {
        20
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    /// Chord string -> command name.
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub path: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("pilot").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Options for `EditorState`. A kill ring needs at least one slot.
    pub fn editor_options(&self) -> EditorOptions {
        let editor = &self.file.editor;
        let raw = editor.maximum_kill_ring_count;
        let count = raw.max(1);
        if count != raw {
            info!(target: "config", raw, clamped = count, "kill_ring_count_clamped");
        }
        EditorOptions {
            word_delimiters: editor.word_delimiters.clone(),
            maximum_kill_ring_count: count,
            continuation_prompt: editor.continuation_prompt.clone(),
            bell: editor.bell.into(),
        }
    }

    pub fn throttle(&self) -> Throttle {
        Throttle::from_millis(
            self.file.stream.refresh_interval_ms,
            self.file.stream.whole_line_interval_ms,
        )
    }

    /// Apply `[keys]` overrides. Entries that do not parse are logged and
    /// skipped. Returns how many were applied.
    pub fn apply_keys(&self, keymap: &mut Keymap) -> usize {
        let mut applied = 0;
        for (chord, command) in &self.file.keys {
            match keymap.bind_str(chord, command) {
                Ok(()) => applied += 1,
                Err(e) => {
                    warn!(target: "config", %chord, %command, error = %e, "key_binding_skipped");
                }
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_keymap::{CommandId, KeyChord};
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use std::time::Duration;
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn captured<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    fn load_str(content: &str) -> Config {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        load_from(Some(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.editor_options(), EditorOptions::default());
        assert_eq!(cfg.throttle(), Throttle::default());
    }

    #[test]
    fn parses_editor_section() {
        let cfg = load_str(
            "[editor]\nword_delimiters = \";,\"\nmaximum_kill_ring_count = 3\n\
             continuation_prompt = \"| \"\nbell = \"visual\"\n",
        );
        let opts = cfg.editor_options();
        assert_eq!(opts.word_delimiters, ";,");
        assert_eq!(opts.maximum_kill_ring_count, 3);
        assert_eq!(opts.continuation_prompt, "| ");
        assert_eq!(opts.bell, BellStyle::Visual);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg = load_str("[editor]\nbell = \"none\"\n[stream]\nrefresh_interval_ms = 5\n");
        let opts = cfg.editor_options();
        assert_eq!(opts.bell, BellStyle::None);
        assert_eq!(opts.word_delimiters, EditorOptions::default().word_delimiters);
        let t = cfg.throttle();
        assert_eq!(t.refresh_interval, Duration::from_millis(5));
        assert_eq!(t.whole_line_interval, Duration::from_millis(20));
    }

    #[test]
    fn parse_failure_falls_back_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor]\nbell = \"loud\"\n").unwrap();
        let mut cfg = None;
        let log = captured(|| cfg = Some(load_from(Some(tmp.path().to_path_buf())).unwrap()));
        let cfg = cfg.unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.editor_options().bell, BellStyle::Audible);
        assert!(log.contains("WARN config:"));
        assert!(log.contains("config_parse_failed_using_defaults"));
    }

    #[test]
    fn zero_kill_ring_is_clamped_and_logged() {
        let cfg = load_str("[editor]\nmaximum_kill_ring_count = 0\n");
        let mut opts = None;
        let log = captured(|| opts = Some(cfg.editor_options()));
        assert_eq!(opts.unwrap().maximum_kill_ring_count, 1);
        assert!(log.contains("INFO config:"));
        assert!(log.contains("kill_ring_count_clamped"));
    }

    #[test]
    fn key_overrides_apply_and_bad_entries_are_skipped() {
        let cfg = load_str(
            "[keys]\n\"Ctrl+t\" = \"kill-line\"\n\"Ctrl+q\" = \"no-such-command\"\n\"Hyper+x\" = \"yank\"\n",
        );
        let mut keymap = Keymap::emacs();
        assert_eq!(cfg.apply_keys(&mut keymap), 1);
        let chord: KeyChord = "Ctrl+t".parse().unwrap();
        assert_eq!(keymap.lookup(&chord), Some(CommandId::KillLine));
    }
}
