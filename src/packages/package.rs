// src/packages/package.rs

//! Package objects stored in a `PackageSack`

use std::fmt;

/// A package available from, or installed into, a repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub epoch: i64,
    pub version: String,
    pub release: String,
    pub arch: String,

    /// Id of the repository the package belongs to
    pub repo_id: String,

    pub summary: String,
    pub url: Option<String>,

    /// Name of the source package this package was built from
    pub sourcerpm: Option<String>,

    /// Capabilities this package provides
    pub provides: Vec<String>,

    /// Capabilities this package requires
    pub requires: Vec<String>,

    /// Package size in bytes
    pub size: i64,

    /// Whether the package is installed on the system
    pub installed: bool,
}

impl Package {
    pub fn new(name: &str, epoch: i64, version: &str, release: &str, arch: &str) -> Self {
        Self {
            name: name.to_string(),
            epoch,
            version: version.to_string(),
            release: release.to_string(),
            arch: arch.to_string(),
            ..Self::default()
        }
    }

    /// `[epoch:]version-release`, the epoch only when non-zero
    pub fn evr(&self) -> String {
        if self.epoch == 0 {
            format!("{}-{}", self.version, self.release)
        } else {
            format!("{}:{}-{}", self.epoch, self.version, self.release)
        }
    }

    /// `name-[epoch:]version-release.arch`, the epoch only when non-zero
    pub fn nevra(&self) -> String {
        format!("{}-{}.{}", self.name, self.evr(), self.arch)
    }

    /// `name-epoch:version-release.arch`, always with the epoch
    pub fn full_nevra(&self) -> String {
        format!(
            "{}-{}:{}-{}.{}",
            self.name, self.epoch, self.version, self.release, self.arch
        )
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nevra())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nevra_without_epoch() {
        let pkg = Package::new("bash", 0, "5.2.26", "3.fc40", "x86_64");
        assert_eq!(pkg.evr(), "5.2.26-3.fc40");
        assert_eq!(pkg.nevra(), "bash-5.2.26-3.fc40.x86_64");
        assert_eq!(pkg.full_nevra(), "bash-0:5.2.26-3.fc40.x86_64");
        assert_eq!(pkg.to_string(), pkg.nevra());
    }

    #[test]
    fn test_nevra_with_epoch() {
        let pkg = Package::new("vim-enhanced", 2, "9.1.158", "1.fc40", "aarch64");
        assert_eq!(pkg.evr(), "2:9.1.158-1.fc40");
        assert_eq!(pkg.nevra(), "vim-enhanced-2:9.1.158-1.fc40.aarch64");
        assert_eq!(pkg.full_nevra(), pkg.nevra());
    }
}
