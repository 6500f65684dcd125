use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const BASE_SCORE: f64 = 100.0;
pub const UNRANKED: &str = "-";

/// The single shared session window. Times are epoch milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Session {
    pub started: bool,
    #[serde(rename = "startTime")]
    pub start_time_ms: Option<u64>,
    #[serde(rename = "endTime")]
    pub end_time_ms: Option<u64>,
}

/// Where a player is in their run. A finished run carries its score, so a
/// score can never exist without an end time.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    InPlay,
    Finished { end_time_ms: u64, score: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub start_time_ms: u64,
    pub progress: Progress,
}

impl Player {
    pub fn new(name: impl Into<String>, start_time_ms: u64) -> Self {
        Self {
            name: name.into(),
            start_time_ms,
            progress: Progress::InPlay,
        }
    }

    /// Records the finish time and derives the score from elapsed seconds.
    /// The first recorded finish is final; later calls are no-ops.
    pub fn finish(&mut self, now_ms: u64) {
        if let Progress::InPlay = self.progress {
            let elapsed = elapsed_seconds(self.start_time_ms, now_ms);
            self.progress = Progress::Finished {
                end_time_ms: now_ms,
                score: score(elapsed),
            };
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.progress, Progress::Finished { .. })
    }

    pub fn end_time_ms(&self) -> Option<u64> {
        match self.progress {
            Progress::InPlay => None,
            Progress::Finished { end_time_ms, .. } => Some(end_time_ms),
        }
    }

    /// Zero until the player finishes.
    pub fn score(&self) -> i64 {
        match self.progress {
            Progress::InPlay => 0,
            Progress::Finished { score, .. } => score,
        }
    }
}

/// Signed difference between two timestamps in seconds. Negative when the
/// end timestamp precedes the start timestamp (clock skew).
pub fn elapsed_seconds(start_ms: u64, end_ms: u64) -> f64 {
    (end_ms as i64 - start_ms as i64) as f64 / 1000.0
}

/// Faster finishes score higher: `max(0, round(100 - elapsed_seconds))`.
/// Clamped below at zero; no upper clamp, so a negative elapsed time yields
/// a score above 100.
pub fn score(elapsed_seconds: f64) -> i64 {
    (BASE_SCORE - elapsed_seconds).round().max(0.0) as i64
}

/// Flat wire projection of a [`Player`], matching the JSON shape clients
/// consume: `{"name", "startTime", "endTime", "score"}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerView {
    pub name: String,
    #[serde(rename = "startTime")]
    pub start_time_ms: u64,
    #[serde(rename = "endTime")]
    pub end_time_ms: Option<u64>,
    pub score: i64,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            start_time_ms: player.start_time_ms,
            end_time_ms: player.end_time_ms(),
            score: player.score(),
        }
    }
}

/// Leaderboard position. Serializes as the 1-based position for finished
/// players and as the string `"-"` for players still in play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rank {
    Position(u32),
    Unranked,
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rank::Position(position) => serializer.serialize_u32(*position),
            Rank::Unranked => serializer.serialize_str(UNRANKED),
        }
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankVisitor;

        impl Visitor<'_> for RankVisitor {
            type Value = Rank;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a numeric rank or \"-\"")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Rank, E> {
                Ok(Rank::Position(value as u32))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Rank, E> {
                if value == UNRANKED {
                    Ok(Rank::Unranked)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                }
            }
        }

        deserializer.deserialize_any(RankVisitor)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankedPlayer {
    #[serde(flatten)]
    pub player: PlayerView,
    pub rank: Rank,
}

/// Snapshot leaderboard ordered by descending score. The sort is stable, so
/// players with equal scores keep their registration order. Players still in
/// play sort with their default score of zero and keep their slot in the
/// ordering, but only finished players receive a numeric rank.
pub fn rank_players(players: &[Player]) -> Vec<RankedPlayer> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by_key(|player| std::cmp::Reverse(player.score()));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, player)| RankedPlayer {
            player: PlayerView::from(player),
            rank: if player.is_finished() {
                Rank::Position(index as u32 + 1)
            } else {
                Rank::Unranked
            },
        })
        .collect()
}

/// Body of `POST /player/start` and `POST /player/end`. The name is kept
/// optional so a missing field reaches the registry's presence check instead
/// of being rejected during deserialization.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NameRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionStatus {
    pub session: Session,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionResponse {
    pub message: String,
    pub session: Session,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerResponse {
    pub message: String,
    pub player: PlayerView,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
}
