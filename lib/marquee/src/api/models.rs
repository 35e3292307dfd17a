//! Media-manager payloads.
//!
//! Identifiers are opaque strings (UUIDs on the backend). Fields the backend
//! defaults are `#[serde(default)]` here too.

#![allow(missing_docs)]

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Whether the account is enabled.
    #[serde(default = "enabled")]
    pub is_active: bool,
    /// Administrator flag.
    #[serde(default)]
    pub is_superuser: bool,
    /// Whether the email was verified.
    #[serde(default)]
    pub is_verified: bool,
}

const fn enabled() -> bool {
    true
}

/// What the login screen can offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMetadata {
    /// Names of the configured OAuth providers.
    #[serde(default)]
    pub oauth_providers: Vec<String>,
}

/// Where to send the browser to start an OAuth login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthAuthorization {
    /// Provider authorization URL.
    pub authorization_url: String,
}

/// The value is not a known quality code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("unknown quality code {_0}")]
pub struct UnknownCode(#[error(not(source))] pub u8);

/// Release quality, sent as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    /// 4K.
    #[display("4K")]
    Uhd,
    /// 1080p.
    #[display("1080p")]
    FullHd,
    /// 720p.
    #[display("720p")]
    Hd,
    /// 400p.
    #[display("400p")]
    Sd,
    /// Not detected.
    #[display("unknown")]
    Unknown,
}

impl TryFrom<u8> for Quality {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Uhd),
            2 => Ok(Self::FullHd),
            3 => Ok(Self::Hd),
            4 => Ok(Self::Sd),
            5 => Ok(Self::Unknown),
            other => Err(UnknownCode(other)),
        }
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Uhd => 1,
            Quality::FullHd => 2,
            Quality::Hd => 3,
            Quality::Sd => 4,
            Quality::Unknown => 5,
        }
    }
}

/// Download state of a torrent, sent as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TorrentStatus {
    /// Download complete.
    #[display("finished")]
    Finished,
    /// In progress.
    #[display("downloading")]
    Downloading,
    /// Failed.
    #[display("error")]
    Error,
    /// Not reported by the download client.
    #[display("unknown")]
    Unknown,
}

impl TryFrom<u8> for TorrentStatus {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, UnknownCode> {
        match code {
            1 => Ok(Self::Finished),
            2 => Ok(Self::Downloading),
            3 => Ok(TorrentStatus::Error),
            4 => Ok(Self::Unknown),
            other => Err(UnknownCode(other)),
        }
    }
}

impl From<TorrentStatus> for u8 {
    fn from(status: TorrentStatus) -> Self {
        match status {
            TorrentStatus::Finished => 1,
            TorrentStatus::Downloading => 2,
            TorrentStatus::Error => 3,
            TorrentStatus::Unknown => 4,
        }
    }
}

/// A movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub name: String,
    pub overview: String,
    pub year: Option<i32>,
    pub external_id: i64,
    pub metadata_provider: String,
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub downloaded: bool,
    #[serde(default)]
    pub torrents: Vec<MediaTorrent>,
}

/// A torrent attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTorrent {
    pub torrent_id: String,
    pub torrent_title: String,
    pub status: TorrentStatus,
    pub quality: Quality,
    pub imported: bool,
    pub file_path_suffix: String,
    #[serde(default)]
    pub usenet: bool,
}

/// A TV show with its seasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub name: String,
    pub overview: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub ended: bool,
    pub external_id: i64,
    pub metadata_provider: String,
    #[serde(default)]
    pub continuous_download: bool,
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// A season with its episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub number: u32,
    pub name: String,
    pub overview: String,
    pub external_id: i64,
    #[serde(default)]
    pub downloaded: bool,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// An episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub number: u32,
    pub external_id: i64,
    pub title: String,
}

/// A file imported for a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonFile {
    pub season_id: String,
    pub quality: Quality,
    pub torrent_id: Option<String>,
    pub file_path_suffix: String,
    #[serde(default)]
    pub downloaded: bool,
}

/// A torrent covering one or more seasons of a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTorrent {
    pub torrent_id: String,
    pub torrent_title: String,
    pub status: TorrentStatus,
    pub quality: Quality,
    pub imported: bool,
    #[serde(default)]
    pub usenet: bool,
    pub file_path_suffix: String,
    #[serde(default)]
    pub seasons: Vec<u32>,
}

/// A show and all its torrents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowTorrents {
    pub show_id: String,
    pub name: String,
    pub year: Option<i32>,
    pub metadata_provider: String,
    #[serde(default)]
    pub torrents: Vec<SeasonTorrent>,
}
