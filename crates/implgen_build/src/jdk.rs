use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum JdkError {
    #[error("JDK not found: {0}")]
    NotFound(String),
    #[error("cannot determine JDK version: {0}")]
    VersionParse(String),
    #[error("JDK {detected} is older than the requested release {required}")]
    TooOld { detected: u32, required: u32 },
}

#[derive(Debug, Clone)]
pub struct JdkInfo {
    pub javac_path: PathBuf,
    pub java_home: Option<PathBuf>,
    /// `None` when no `java` launcher sits next to `javac`.
    pub major_version: Option<u32>,
}

impl JdkInfo {
    /// Fail when the JDK is known to be older than `release`.
    pub fn ensure_release(&self, release: u32) -> Result<(), JdkError> {
        match self.major_version {
            Some(detected) if detected < release => Err(JdkError::TooOld {
                detected,
                required: release,
            }),
            _ => Ok(()),
        }
    }
}

/// Locate `javac`: the explicit override, then `JAVA_HOME`/`JDK_HOME`, then
/// `PATH`, then well-known installation roots.
pub fn discover_jdk(javac_override: Option<&Path>) -> Result<JdkInfo, JdkError> {
    let javac_path = match javac_override {
        Some(path) => javac_from_home(path).ok_or_else(|| {
            JdkError::NotFound(format!("configured javac '{}' does not exist", path.display()))
        })?,
        None => find_javac().ok_or_else(|| {
            JdkError::NotFound(
                "unable to locate 'javac'; set JAVA_HOME or put a JDK on PATH".into(),
            )
        })?,
    };

    let java_home = find_jdk_home_from_javac(&javac_path);
    let major_version = match &java_home {
        Some(home) => Some(get_jdk_version(home)?),
        None => None,
    };

    debug!(
        javac = %javac_path.display(),
        major_version = ?major_version,
        "discovered JDK"
    );

    Ok(JdkInfo {
        javac_path,
        java_home,
        major_version,
    })
}

fn find_javac() -> Option<PathBuf> {
    find_javac_from_env()
        .or_else(find_javac_in_path)
        .or_else(search_known_installations)
}

fn find_javac_from_env() -> Option<PathBuf> {
    for var in ["JAVA_HOME", "JDK_HOME"] {
        if let Ok(value) = env::var(var) {
            let path = PathBuf::from(value);
            if let Some(javac) = javac_from_home(&path) {
                return Some(javac);
            }
        }
    }
    None
}

fn find_javac_in_path() -> Option<PathBuf> {
    which::which(javac_executable()).ok()
}

fn search_known_installations() -> Option<PathBuf> {
    known_jdk_roots()
        .iter()
        .find_map(|root| search_root_for_jdk(root))
}

fn known_jdk_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    #[cfg(target_os = "windows")]
    {
        roots.push(PathBuf::from(r"C:\Program Files\Java"));
        roots.push(PathBuf::from(r"C:\Program Files\Eclipse Adoptium"));
        if let Some(dir) = env::var_os("ProgramFiles").map(PathBuf::from) {
            roots.push(dir.join("Java"));
            roots.push(dir.join("Zulu"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        roots.push(PathBuf::from("/Library/Java/JavaVirtualMachines"));
        roots.push(PathBuf::from("/opt/homebrew/opt/openjdk"));
        roots.push(PathBuf::from("/usr/local/opt/openjdk"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        roots.push(PathBuf::from("/usr/lib/jvm"));
        roots.push(PathBuf::from("/usr/java"));
        roots.push(PathBuf::from("/opt/java"));
        roots.push(PathBuf::from("/opt/jdk"));
    }

    roots
}

fn search_root_for_jdk(root: &Path) -> Option<PathBuf> {
    if !root.is_dir() {
        return None;
    }
    if let Some(javac) = javac_from_home(root) {
        return Some(javac);
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(root)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    candidates.sort();

    candidates.into_iter().find_map(|path| {
        let contents_home = path.join("Contents").join("Home");
        if contents_home.is_dir() {
            javac_from_home(&contents_home)
        } else {
            javac_from_home(&path)
        }
    })
}

/// Accepts a JDK home, its `bin` directory, or the executable itself.
fn javac_from_home(home: &Path) -> Option<PathBuf> {
    let exe_name = javac_executable();

    if home.is_file() {
        return Some(home.to_path_buf());
    }

    let candidate = home.join("bin").join(exe_name);
    if candidate.is_file() {
        return Some(candidate);
    }

    if home.file_name() == Some(OsStr::new("bin")) {
        let candidate = home.join(exe_name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

/// The JDK home above `bin/javac`, following links such as `/usr/bin/javac`.
fn find_jdk_home_from_javac(javac_path: &Path) -> Option<PathBuf> {
    let resolved = fs::canonicalize(javac_path).unwrap_or_else(|_| javac_path.to_path_buf());
    let bin_dir = resolved.parent()?;
    let home = bin_dir.parent()?;
    if bin_dir.join(java_executable()).is_file() {
        Some(home.to_path_buf())
    } else {
        None
    }
}

fn get_jdk_version(jdk_home: &Path) -> Result<u32, JdkError> {
    let java_exe = jdk_home.join("bin").join(java_executable());
    let output = Command::new(&java_exe)
        .arg("-version")
        .output()
        .map_err(|error| {
            JdkError::NotFound(format!(
                "failed to run '{} -version': {}",
                java_exe.display(),
                error
            ))
        })?;

    let mut version_output = String::from_utf8_lossy(&output.stderr).to_string();
    if version_output.trim().is_empty() {
        version_output = String::from_utf8_lossy(&output.stdout).to_string();
    }

    parse_major_version(&version_output).map_err(|error| JdkError::VersionParse(error.into()))
}

pub(crate) fn parse_major_version(output: &str) -> Result<u32, &'static str> {
    if let Some(token) = extract_version_token(output) {
        return interpret_version_token(token).ok_or("unsupported version token format");
    }
    Err("no version token in output")
}

fn extract_version_token(output: &str) -> Option<&str> {
    for line in output.lines() {
        if let Some(start) = line.find('"') {
            let rest = &line[start + 1..];
            if let Some(end) = rest.find('"') {
                return Some(&rest[..end]);
            }
        }
    }
    None
}

fn interpret_version_token(token: &str) -> Option<u32> {
    if let Some(stripped) = token.strip_prefix("1.") {
        let minor = stripped
            .split(|ch| ch == '.' || ch == '_' || ch == '-')
            .next()?;
        return minor
            .chars()
            .take_while(|ch| ch.is_ascii_digit())
            .collect::<String>()
            .parse::<u32>()
            .ok();
    }

    let digits: String = token.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    digits.parse::<u32>().ok()
}

pub(crate) fn javac_executable() -> &'static str {
    if cfg!(windows) {
        "javac.exe"
    } else {
        "javac"
    }
}

fn java_executable() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}
