use crate::control::listener::Listener;
use crate::model::*;
use crate::util::misc::vec_to_string;

// [EventPrinter]
#[derive(Debug)]
pub struct EventPrinter {}

impl EventPrinter {
    pub fn new() -> Self {
        Self {}
    }

    fn print_score_change(&self, scores: &[Score], standings: &[Standing]) {
        for st in standings {
            let delta = scores
                .iter()
                .find(|s| s.player_id == st.player_id)
                .map(|s| s.point)
                .unwrap_or(0);
            let new = st.score;
            let old = new - delta;
            println!("player {}: {} -> {} ({:+})", st.player_id, old, new, delta);
        }
        println!();
    }

    fn print_standings(&self, standings: &[Standing]) {
        for st in standings {
            println!(
                "rank {}: player {} (seat{}) {}",
                st.rank + 1,
                st.player_id,
                st.seat,
                st.score
            );
        }
        println!();
    }
}

impl Listener for EventPrinter {
    fn notify_event(&mut self, event: &Event) {
        use Event::*;
        match event {
            Begin(e) => {
                println!("Begin");
                println!("players: {}", vec_to_string(&e.players));
                println!();
            }
            New(e) => {
                println!(
                    "New {}{}局 {}本場 供託:{} 親:player {}",
                    e.wind,
                    crate::control::round_number_within_wind(e.number),
                    e.honba,
                    e.riichi_sticks,
                    e.dealer,
                );
            }
            Action(e) => {
                println!(
                    "Action {}{}",
                    e.action,
                    if e.is_removed { " (removed)" } else { "" }
                );
            }
            Win(e) => {
                println!("Win {} (本場:{}, 供託:{})", e.result, e.honba, e.riichi_sticks);
                for s in &e.scores {
                    if let Some(d) = &s.detail {
                        println!("player {}: {}飜{}符 {}", s.player_id, d.han, d.fu, d.yakus.join(","));
                    }
                }
                self.print_score_change(&e.scores, &e.standings);
            }
            Draw(e) => {
                println!("Draw {}", e.result);
                self.print_score_change(&e.scores, &e.standings);
            }
            End(e) => {
                println!("End");
                self.print_standings(&e.standings);
            }
        }
    }
}
