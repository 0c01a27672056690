//! Plain-text rendering of battle state and round outcomes.
use duel_core::{
    ActionTaken, Battle, BattleStatus, Combatant, DuelError, RoundOutcome, SideOutcome,
    SkillCatalog, SkillId, StatusApplication, StatusKind, StruggleReason, Winner,
};
use duel_runtime::{RuntimeError, SubmitResult};

/// Display name of a skill, falling back to its id.
fn skill_name<'a>(catalog: &'a SkillCatalog, id: &'a SkillId) -> &'a str {
    catalog.lookup(id).map_or(id.as_str(), |skill| skill.name.as_str())
}

fn hp_line(combatant: &Combatant) -> String {
    let mut line = format!(
        "{} HP {}/{}",
        combatant.player_id, combatant.hp, combatant.max_hp
    );
    let statuses: Vec<String> = combatant
        .statuses
        .iter()
        .map(|e| match e.kind {
            StatusKind::Silence => format!("{} ({}r)", e.kind, e.remaining_turns),
            _ => format!("{} {} ({}r)", e.kind, e.magnitude, e.remaining_turns),
        })
        .collect();
    if !statuses.is_empty() {
        line.push_str(&format!(" [{}]", statuses.join(", ")));
    }
    line
}

pub fn battle_created(battle: &Battle) -> String {
    let mut lines = vec![format!(
        "battle {} opened in {} (seed {})",
        battle.battle_id, battle.chat_id, battle.seed
    )];
    if battle.is_full() {
        lines.push(format!(
            "{} - fight! submit with `act {} <player> <skill>`",
            seats(battle),
            battle.battle_id
        ));
    } else {
        lines.push(format!(
            "waiting for an opponent: `join {} <player>`",
            battle.battle_id
        ));
    }
    lines.join("\n")
}

fn seats(battle: &Battle) -> String {
    battle
        .players()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" vs ")
}

/// Remaining cooldown of every non-basic skill, in catalog order.
fn cooldown_line(catalog: &SkillCatalog, combatant: &Combatant) -> String {
    let cooldowns: Vec<String> = catalog
        .iter()
        .filter(|skill| !skill.is_basic_attack())
        .map(|skill| match combatant.cooldown(&skill.id) {
            0 => format!("{} ready", skill.name),
            turns => format!("{} {turns}", skill.name),
        })
        .collect();
    format!("{} cooldowns: {}", combatant.player_id, cooldowns.join(", "))
}

/// Status summary of a battle.
pub fn battle(catalog: &SkillCatalog, battle: &Battle) -> String {
    let mut lines = vec![format!(
        "battle {} ({}) - {}, round {}, seed {}",
        battle.battle_id, battle.chat_id, battle.status, battle.round_number, battle.seed
    )];
    lines.extend(battle.combatants.iter().map(hp_line));
    lines.extend(battle.combatants.iter().map(|c| cooldown_line(catalog, c)));

    match battle.status {
        BattleStatus::WaitingForPlayers => lines.push("waiting for an opponent".into()),
        BattleStatus::InProgress => {
            for player in battle.players() {
                let state = if battle.pending_for(player).is_some() {
                    "locked in"
                } else {
                    "choosing"
                };
                lines.push(format!("{player}: {state}"));
            }
        }
        BattleStatus::Finished => {
            if let Some(winner) = battle.winner {
                lines.push(winner_line(winner));
            }
        }
    }
    lines.join("\n")
}

fn winner_line(winner: Winner) -> String {
    match winner {
        Winner::Player(player) => format!("battle over: {player} wins!"),
        Winner::Draw => "battle over: both fighters fell, it's a draw!".into(),
    }
}

pub fn submission(catalog: &SkillCatalog, result: &SubmitResult) -> String {
    match result {
        SubmitResult::WaitingForOpponent {
            round_number,
            player_id,
            ..
        } => format!(
            "{player_id} locked an action for round {round_number}; waiting for the opponent"
        ),
        SubmitResult::RoundResolved { outcome, battle } => {
            let mut text = round(catalog, outcome);
            if let Some(winner) = battle.winner {
                text.push('\n');
                text.push_str(&winner_line(winner));
            }
            text
        }
    }
}

/// Narration of one resolved round.
pub fn round(catalog: &SkillCatalog, outcome: &RoundOutcome) -> String {
    let mut lines = vec![format!("=== Round {} ===", outcome.round_number)];

    for side in &outcome.sides {
        lines.extend(action_lines(catalog, side));
    }

    lines.push("-- end of round --".into());
    let poisoned: Vec<&SideOutcome> = outcome.sides.iter().filter(|s| s.poison_taken > 0).collect();
    if poisoned.is_empty() {
        lines.push("nobody is poisoned".into());
    }
    for side in poisoned {
        lines.push(format!("{} takes {} poison damage", side.player_id, side.poison_taken));
    }
    for side in &outcome.sides {
        if !side.statuses_expired.is_empty() {
            let kinds: Vec<String> = side.statuses_expired.iter().map(|k| k.to_string()).collect();
            lines.push(format!("{} is no longer affected by {}", side.player_id, kinds.join(", ")));
        }
    }

    for side in &outcome.sides {
        let mut line = format!("{} HP {}/{}", side.player_id, side.hp_after, side.max_hp);
        if side.defeated {
            line.push_str(" (defeated)");
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn action_lines(catalog: &SkillCatalog, side: &SideOutcome) -> Vec<String> {
    let actor = side.player_id;
    let mut lines = Vec::new();

    let used = side.used.as_ref().map(|id| skill_name(catalog, id));
    match (side.action, used) {
        (ActionTaken::Struggle(reason), _) => {
            let why = match reason {
                StruggleReason::NoAction => "no action was chosen".to_string(),
                StruggleReason::UnknownSkill => match &side.requested {
                    Some(id) => format!("there is no skill `{id}`"),
                    None => "the skill is unknown".to_string(),
                },
                StruggleReason::OnCooldown { remaining } => {
                    format!("the skill is cooling down ({remaining} more round(s))")
                }
            };
            lines.push(format!("{actor} struggles: {why}"));
            return lines;
        }
        (ActionTaken::ForcedBasicAttack, Some(name)) => {
            lines.push(format!("{actor} is silenced and can only use {name}"));
        }
        (_, Some(name)) => lines.push(format!("{actor} uses {name}")),
        (_, None) => {}
    }

    if side.damage_dealt > 0 || side.damage_absorbed > 0 {
        let mut line = format!("  deals {} damage", side.damage_dealt);
        if side.damage_absorbed > 0 {
            line.push_str(&format!(" ({} absorbed by shield)", side.damage_absorbed));
        }
        lines.push(line);
    }

    for status in &side.statuses_applied {
        let effect = match status.kind {
            StatusKind::Silence => format!("silence for {} round(s)", status.duration),
            kind => format!("{kind} {} for {} round(s)", status.magnitude, status.duration),
        };
        let line = match status.application {
            StatusApplication::Applied => format!("  {} gains {effect}", status.target),
            StatusApplication::Refreshed => format!("  {} has {effect} refreshed", status.target),
            StatusApplication::Dropped => {
                format!("  {} cannot hold more statuses; {} is lost", status.target, status.kind)
            }
        };
        lines.push(line);
    }
    for kind in &side.statuses_resisted {
        lines.push(format!("  {kind} did not take hold"));
    }
    if let Some(turns) = side.cooldown_set {
        lines.push(format!("  cooldown: {turns} round(s)"));
    }
    lines
}

/// Numbered catalog listing, in the order accepted by `act <battle> <player> <n>`.
pub fn skills(catalog: &SkillCatalog) -> String {
    catalog
        .iter()
        .enumerate()
        .map(|(i, skill)| {
            let damage = if skill.has_damage_range() {
                format!("{}-{}", skill.base_damage, skill.max_damage)
            } else {
                skill.base_damage.to_string()
            };
            let mut line = format!("{:>2}. {} [{}] dmg {damage}", i + 1, skill.name, skill.id);
            if skill.cooldown_turns > 0 {
                line.push_str(&format!(", cd {}", skill.cooldown_turns));
            }
            for template in &skill.status_effects {
                line.push_str(&format!(
                    ", {} {}x{}",
                    template.kind, template.magnitude, template.duration
                ));
                if template.chance_percent < 100 {
                    line.push_str(&format!(" @{}%", template.chance_percent));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn error(err: &RuntimeError) -> String {
    format!("error [{}/{}]: {err}", err.severity().as_str(), err.error_code())
}
