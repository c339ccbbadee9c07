use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use ghquick::exec::RealExecutor;
use tokio::process::Command;

/// Whether a git new enough for `GIT_CONFIG_GLOBAL` (2.32) is installed.
pub fn git_available() -> bool {
    let Ok(output) = std::process::Command::new("git").arg("--version").output() else {
        return false;
    };
    let version = String::from_utf8_lossy(&output.stdout);
    let mut parts = version
        .split_whitespace()
        .nth(2)
        .unwrap_or_default()
        .split('.')
        .map(|part| part.parse::<u32>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    (major, minor) >= (2, 32)
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}

/// An isolated git environment: its own global config, a working directory
/// and a bare repository to push to.
pub struct GitSandbox {
    root: TestDir,
}

impl GitSandbox {
    pub async fn new() -> anyhow::Result<Self> {
        let root = TestDir::new()?;
        tokio::fs::create_dir(root.path().join("work")).await?;
        tokio::fs::write(
            root.path().join("gitconfig"),
            "[user]\n\tname = Test User\n\temail = test@example.com\n[init]\n\tdefaultBranch = main\n",
        )
        .await?;
        Ok(Self { root })
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.path().join("work")
    }

    pub fn remote_dir(&self) -> PathBuf {
        self.root.path().join("remote.git")
    }

    fn global_config(&self) -> PathBuf {
        self.root.path().join("gitconfig")
    }

    /// An executor confined to this sandbox's git config.
    pub fn executor(&self) -> RealExecutor {
        RealExecutor::new()
            .with_env("GIT_CONFIG_GLOBAL", self.global_config().to_string_lossy())
            .with_env("GIT_CONFIG_NOSYSTEM", "1")
    }

    /// Run git in `dir` and return its trimmed stdout.
    pub async fn git(&self, dir: &Path, args: &[&str]) -> anyhow::Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_CONFIG_GLOBAL", self.global_config())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .stdin(Stdio::null())
            .output()
            .await?;
        anyhow::ensure!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    /// A work repository with one committed file, linked to an empty bare remote.
    pub async fn with_committed_file(self, name: &str, contents: &str) -> anyhow::Result<Self> {
        let work = self.work_dir();
        let remote = self.remote_dir().to_string_lossy().into_owned();
        self.git(self.root.path(), &["init", "--bare", remote.as_str()])
            .await?;
        self.git(&work, &["init"]).await?;
        self.git(&work, &["remote", "add", "origin", remote.as_str()])
            .await?;
        tokio::fs::write(work.join(name), contents).await?;
        self.git(&work, &["add", name]).await?;
        self.git(&work, &["commit", "-m", "initial"]).await?;
        Ok(self)
    }
}
