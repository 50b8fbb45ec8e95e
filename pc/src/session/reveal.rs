//! Reveal loop
//!
//! Walks items one after another, step by step, sleeping between status
//! changes. The task never touches state itself: every change is sent to the
//! actor tagged with the epoch it was started under, and the actor drops
//! anything from a superseded epoch.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use super::messages::{RevealUpdate, SessionCommand};

/// One item's pre-sampled per-step delays
#[derive(Debug, Clone)]
pub struct RevealItem {
    pub item_id: String,
    pub delays: Vec<Duration>,
}

/// Everything a reveal task needs, sampled up front by the actor
#[derive(Debug, Clone)]
pub struct RevealPlan {
    pub epoch: u64,
    pub items: Vec<RevealItem>,
}

impl RevealPlan {
    /// Total time the reveal will sleep
    pub fn total_delay(&self) -> Duration {
        self.items.iter().flat_map(|i| i.delays.iter()).sum()
    }
}

/// Run the reveal; returns early if the actor has gone away
pub async fn run_reveal(tx: mpsc::Sender<SessionCommand>, plan: RevealPlan) {
    debug!(epoch = plan.epoch, items = plan.items.len(), total_delay = ?plan.total_delay(), "run_reveal: called");
    let epoch = plan.epoch;
    let send = |update: RevealUpdate| {
        let tx = tx.clone();
        async move { tx.send(SessionCommand::Reveal { epoch, update }).await.is_ok() }
    };

    for item in plan.items {
        for (index, delay) in item.delays.into_iter().enumerate() {
            if !send(RevealUpdate::StepStarted {
                item_id: item.item_id.clone(),
                index,
            })
            .await
            {
                debug!(epoch, "run_reveal: actor gone, stopping");
                return;
            }

            tokio::time::sleep(delay).await;

            if !send(RevealUpdate::StepCompleted {
                item_id: item.item_id.clone(),
                index,
            })
            .await
            {
                return;
            }
        }

        if !send(RevealUpdate::ItemDone {
            item_id: item.item_id.clone(),
        })
        .await
        {
            return;
        }
    }

    send(RevealUpdate::Finished).await;
    debug!(epoch, "run_reveal: finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(epoch: u64) -> RevealPlan {
        RevealPlan {
            epoch,
            items: vec![
                RevealItem {
                    item_id: "a".to_string(),
                    delays: vec![Duration::ZERO; 2],
                },
                RevealItem {
                    item_id: "b".to_string(),
                    delays: vec![Duration::ZERO; 1],
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_run_reveal_sends_updates_in_order() {
        let (tx, mut rx) = mpsc::channel(64);
        run_reveal(tx, plan(7)).await;

        let mut updates = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            match cmd {
                SessionCommand::Reveal { epoch, update } => {
                    assert_eq!(epoch, 7);
                    updates.push(update);
                }
                other => panic!("unexpected command {:?}", other),
            }
        }

        let step = |id: &str, index, started| {
            if started {
                RevealUpdate::StepStarted {
                    item_id: id.to_string(),
                    index,
                }
            } else {
                RevealUpdate::StepCompleted {
                    item_id: id.to_string(),
                    index,
                }
            }
        };
        assert_eq!(
            updates,
            vec![
                step("a", 0, true),
                step("a", 0, false),
                step("a", 1, true),
                step("a", 1, false),
                RevealUpdate::ItemDone {
                    item_id: "a".to_string()
                },
                step("b", 0, true),
                step("b", 0, false),
                RevealUpdate::ItemDone {
                    item_id: "b".to_string()
                },
                RevealUpdate::Finished,
            ]
        );
    }

    #[tokio::test]
    async fn test_run_reveal_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(64);
        drop(rx);
        // Must return instead of hanging or panicking
        run_reveal(tx, plan(1)).await;
    }

    #[test]
    fn test_total_delay() {
        let plan = RevealPlan {
            epoch: 0,
            items: vec![RevealItem {
                item_id: "a".to_string(),
                delays: vec![Duration::from_millis(400), Duration::from_millis(650)],
            }],
        };
        assert_eq!(plan.total_delay(), Duration::from_millis(1050));
    }
}
