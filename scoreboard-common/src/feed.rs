//! Messages the controller sends to the display, one JSON object per line.

use crate::model::{GameModel, HistoryFrame, ScoreboardFrame};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum FeedMessage {
    /// A new contest model, replacing whatever the display held before
    Start { model: Box<GameModel> },
    UpdateScoreboard(ScoreboardFrame),
    History(HistoryFrame),
}

impl FeedMessage {
    /// Decodes one line of the feed. Blank lines carry no message.
    ///
    /// The tag is read by hand rather than through serde's internally tagged enums, because
    /// those buffer the payload and then can't read the integer keys of `service_infos`.
    pub fn from_line(line: &str) -> Result<Option<Self>, serde_json::Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(line)?;
        let event = value
            .get("event")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| serde_json::Error::missing_field("event"))?;

        let msg = match event.as_str() {
            "start" => {
                #[derive(Deserialize)]
                struct Start {
                    model: Box<GameModel>,
                }
                let Start { model } = serde_json::from_value(value)?;
                Self::Start { model }
            }
            "updateScoreboard" => Self::UpdateScoreboard(serde_json::from_value(value)?),
            "history" => Self::History(serde_json::from_value(value)?),
            other => {
                return Err(serde_json::Error::unknown_variant(
                    other,
                    &["start", "updateScoreboard", "history"],
                ));
            }
        };
        Ok(Some(msg))
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::UpdateScoreboard(_) => "updateScoreboard",
            Self::History(_) => "history",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_start() {
        let msg = FeedMessage::from_line(
            r#"{"event":"start","model":{"services":[{"id":1,"name":"web"}],"active_services":[1]}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(msg.event_name(), "start");
        match msg {
            FeedMessage::Start { model } => {
                assert_eq!(model.services.len(), 1);
                assert!(!model.has_scoreboard());
            }
            other => panic!("Unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_update_scoreboard() {
        let msg = FeedMessage::from_line(
            r#"{"event":"updateScoreboard","scoreboard":[{"team_id":4,"name":"x","score":12.5}],"active_services":[1,2]}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(msg.event_name(), "updateScoreboard");
        match msg {
            FeedMessage::UpdateScoreboard(frame) => {
                assert_eq!(frame.scoreboard[0].team_id, 4);
                assert_eq!(frame.active_services, Some(vec![1, 2]));
                assert_eq!(frame.service_infos, None);
            }
            other => panic!("Unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_service_infos() {
        let msg = FeedMessage::from_line(
            r#"{"event":"updateScoreboard","scoreboard":[],"service_infos":{"7":{"phase":"HEATING","phase_duration":60}}}"#,
        )
        .unwrap()
        .unwrap();
        match msg {
            FeedMessage::UpdateScoreboard(frame) => {
                let infos = frame.service_infos.unwrap();
                assert_eq!(infos[&7].phase_duration, Some(60));
            }
            other => panic!("Unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_history() {
        let msg = FeedMessage::from_line(r#"{"event":"history","attacks_history":[[1,2],[0,3]]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            msg,
            FeedMessage::History(HistoryFrame {
                attacks_history: vec![vec![1, 2], vec![0, 3]],
                rounds_count: None,
            })
        );
    }

    #[test]
    fn test_blank_and_corrupt_lines() {
        assert_eq!(FeedMessage::from_line("   ").unwrap(), None);
        assert!(FeedMessage::from_line(r#"{"event":"explode"}"#).is_err());
        assert!(FeedMessage::from_line(r#"{"scoreboard":[]}"#).is_err());
        assert!(FeedMessage::from_line("{not json").is_err());
    }
}
