use crate::protocol::*;
use colored::Colorize;

/// How each server frame reads on the terminal. Pure so the wording is
/// testable; the caller decides where it prints.
pub fn render(frame: &Frame) -> String {
    match frame {
        Frame::LoginResponse(r) => verdict(r.success, &r.message),
        Frame::RegisterResponse(r) => verdict(r.success, &r.message),
        Frame::QueueResponse(r) => match r.success {
            true => format!(
                "{} ({} in line)",
                r.message.green(),
                r.queue_size
            ),
            false => r.message.red().to_string(),
        },
        Frame::PingResponse(r) => verdict(r.success, &r.message),
        Frame::StatsResponse(r) => match r.success {
            true => format!(
                "{} {}: {}W {}L ({:.1}%)",
                "stats:".cyan(),
                r.username.clone().unwrap_or_default(),
                r.wins.unwrap_or_default(),
                r.losses.unwrap_or_default(),
                r.win_rate.unwrap_or_default(),
            ),
            false => r.message.red().to_string(),
        },
        Frame::CardPackResponse(r) => match r.success {
            true => format!(
                "{}\n{}\n{} {} hydra / {} quimera / {} gorgona ({} left)",
                r.message.green(),
                r.cards
                    .iter()
                    .map(|card| format!("  • {}", card))
                    .collect::<Vec<_>>()
                    .join("\n"),
                "stock:".cyan(),
                r.stock_info.hydra,
                r.stock_info.quimera,
                r.stock_info.gorgona,
                r.stock_info.total,
            ),
            false => r.message.red().to_string(),
        },
        Frame::MatchFound(e) => format!(
            "{} {} (match {})",
            "MATCH FOUND!".yellow().bold(),
            e.message,
            e.match_id
        ),
        Frame::MatchStart(e) => format!("{} {}", "MATCH START!".yellow().bold(), e.message),
        Frame::MatchEnd(e) => format!(
            "{} {} (winner: {})",
            "MATCH OVER!".yellow().bold(),
            e.message,
            e.winner_name
        ),
        Frame::GameState(e) => match e.your_turn {
            true => format!("{} {}", "YOUR TURN:".cyan().bold(), e.message),
            false => e.message.normal().to_string(),
        },
        Frame::TurnUpdate(e) => match e.your_turn {
            true => format!("{} {}", "YOUR TURN:".cyan().bold(), e.message),
            false => e.message.normal().to_string(),
        },
        other => format!("{} {}", "unexpected frame:".red(), other.tag()),
    }
}

fn verdict(success: bool, message: &str) -> String {
    match success {
        true => message.green().to_string(),
        false => message.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_carry_the_payload() {
        colored::control::set_override(false);
        let found = Frame::MatchFound(MatchFound {
            match_id: 7,
            opponent_id: 2,
            opponent_name: "bob".to_string(),
            message: "Match found! You face bob.".to_string(),
        });
        assert!(render(&found).contains("match 7"));
        assert!(render(&found).contains("bob"));
        let stats = Frame::StatsResponse(StatsResponse::of("alice".to_string(), 2, 1, 66.7));
        assert!(render(&stats).contains("2W 1L"));
        let refused = Frame::QueueResponse(QueueResponse::refused("you have no cards", 0));
        assert!(render(&refused).contains("no cards"));
    }
}
