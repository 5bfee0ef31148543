use crossbeam_channel::Sender;
use log::*;
use scoreboard_common::feed::FeedMessage;
use scoreboard_layout::{DisplaySurface, LiveModelSync, TeamRowHandle};
use std::{path::PathBuf, time::Instant};
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("The display closed the channel")]
    ChannelClosed,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Couldn't decode feed line: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Forwards every message on `reader` to the display, until the feed ends.
///
/// Lines that don't decode are logged and dropped. Returns the number of messages forwarded.
pub async fn read_feed<R: AsyncBufRead + Unpin>(
    reader: R,
    tx: &Sender<FeedMessage>,
) -> Result<usize, FeedError> {
    let mut lines = reader.lines();
    let mut forwarded = 0;

    while let Some(line) = lines.next_line().await? {
        let msg = match FeedMessage::from_line(&line).map_err(FeedError::from) {
            Ok(Some(msg)) => msg,
            Ok(None) => continue,
            Err(e) => {
                warn!("Discarding feed line: {e}");
                continue;
            }
        };
        trace!("Got {} from the feed", msg.event_name());
        tx.send(msg).map_err(|_| FeedError::ChannelClosed)?;
        forwarded += 1;
    }

    Ok(forwarded)
}

#[tokio::main]
pub async fn feed_thread(tx: Sender<FeedMessage>, source: Option<PathBuf>) {
    let result = match &source {
        Some(path) => {
            info!("Reading feed from {}", path.display());
            match tokio::fs::File::open(path).await {
                Ok(file) => read_feed(BufReader::new(file), &tx).await,
                Err(e) => Err(e.into()),
            }
        }
        None => {
            info!("Reading feed from stdin");
            read_feed(BufReader::new(io::stdin()), &tx).await
        }
    };

    match result {
        Ok(count) => info!("Feed ended after {count} messages"),
        Err(FeedError::ChannelClosed) => info!("Display went away, stopping the feed"),
        Err(e) => error!("Lost the feed: {e}"),
    }
}

/// Applies one feed message to the held model and notifies the engine. Returns whether the
/// engine acted on it.
pub fn dispatch<R: TeamRowHandle>(
    sync: &mut LiveModelSync<R>,
    msg: FeedMessage,
    now: Instant,
    surface: &mut dyn DisplaySurface,
) -> bool {
    match msg {
        FeedMessage::Start { model } => {
            sync.start(*model);
            true
        }
        FeedMessage::UpdateScoreboard(frame) => {
            let Some(model) = sync.model_mut() else {
                debug!("Scoreboard frame before start, dropping it");
                return false;
            };
            model.apply_scoreboard(frame);
            sync.update_scoreboard(now, surface)
        }
        FeedMessage::History(frame) => {
            let Some(model) = sync.model_mut() else {
                debug!("History frame before start, dropping it");
                return false;
            };
            model.apply_history(frame);
            sync.history(surface)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{surface::ScreenSurface, team_row::TeamRow};
    use crossbeam_channel::bounded;
    use indoc::indoc;
    use scoreboard_common::config::ViewConfig;
    use scoreboard_layout::ScaleStrategy;

    const FEED: &str = indoc! {r#"
        {"event":"start","model":{"services":[{"id":1,"name":"web"},{"id":2,"name":"pwn"}],"active_services":[1,2],"team_width":400,"one_service_width":100}}

        this is not json
        {"event":"updateScoreboard","scoreboard":[{"team_id":7,"name":"seven","score":12.5}],"service_infos":{"1":{"phase":"HEATING","phase_duration":30}}}
        {"event":"rename"}
        {"event":"history","attacks_history":[[1,2],[3,4]]}
    "#};

    #[tokio::test]
    async fn test_read_feed() {
        let (tx, rx) = bounded(8);
        let count = read_feed(FEED.as_bytes(), &tx).await.unwrap();
        assert_eq!(count, 3);

        let events: Vec<_> = rx.try_iter().map(|m| m.event_name()).collect();
        assert_eq!(events, vec!["start", "updateScoreboard", "history"]);
    }

    #[tokio::test]
    async fn test_read_feed_closed_channel() {
        let (tx, rx) = bounded(8);
        drop(rx);
        assert!(matches!(
            read_feed(FEED.as_bytes(), &tx).await,
            Err(FeedError::ChannelClosed)
        ));
    }

    #[tokio::test]
    async fn test_dispatch() {
        let (tx, rx) = bounded(8);
        read_feed(FEED.as_bytes(), &tx).await.unwrap();

        let now = Instant::now();
        let mut surface = ScreenSurface::new(2000.0);
        let mut sync: LiveModelSync<TeamRow> = LiveModelSync::new(
            &ViewConfig::default(),
            Some(ScaleStrategy::NativeZoom),
            now,
        );

        let taken: Vec<_> = rx
            .try_iter()
            .map(|msg| dispatch(&mut sync, msg, now, &mut surface))
            .collect();
        assert_eq!(taken, vec![true, true, true]);

        let model = sync.model().unwrap();
        assert_eq!(model.scoreboard()[0].team_id, 7);
        assert_eq!(model.rounds_count, 2);
        assert!(model.service_info(1).is_some());
        assert_eq!(sync.visible_service_count(), 2);
        assert_eq!(sync.content_width(), 600.0);
    }

    #[test]
    fn test_dispatch_before_start() {
        let now = Instant::now();
        let mut surface = ScreenSurface::new(2000.0);
        let mut sync: LiveModelSync<TeamRow> =
            LiveModelSync::new(&ViewConfig::default(), None, now);

        let msg = FeedMessage::from_line(r#"{"event":"history","attacks_history":[]}"#)
            .unwrap()
            .unwrap();
        assert!(!dispatch(&mut sync, msg, now, &mut surface));
        assert!(sync.model().is_none());
    }
}
