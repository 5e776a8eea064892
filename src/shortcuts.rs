/*!
 * Keyboard map for the player.
 *
 * Keys are identified by their physical `code` (`Space`, `KeyA`, ...) so the
 * map does not depend on the keyboard layout.
 */

/// Player command bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    TogglePlay,
    PreviousSentence,
    NextSentence,
    ReplayCurrent,
    CycleBlur,
}

/// Where the key event originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyTarget {
    #[default]
    Player,
    /// A text field; typing there must not drive playback
    TextInput,
}

/// Bindings as (codes, command, description), in help order
pub const BINDINGS: &[(&[&str], PlayerCommand, &str)] = &[
    (&["Space"], PlayerCommand::TogglePlay, "Play / pause"),
    (&["ArrowLeft", "KeyA"], PlayerCommand::PreviousSentence, "Previous sentence"),
    (&["ArrowRight", "KeyD"], PlayerCommand::NextSentence, "Next sentence"),
    (&["KeyS"], PlayerCommand::ReplayCurrent, "Replay current sentence"),
    (&["KeyB"], PlayerCommand::CycleBlur, "Cycle blur mode"),
];

/// Command for a key press, if any
pub fn command_for_key(code: &str, target: KeyTarget) -> Option<PlayerCommand> {
    if target == KeyTarget::TextInput {
        return None;
    }

    BINDINGS
        .iter()
        .find(|(codes, _, _)| codes.contains(&code))
        .map(|(_, command, _)| *command)
}

/// One line per binding, e.g. `ArrowLeft / KeyA  Previous sentence`
pub fn help_lines() -> Vec<String> {
    BINDINGS
        .iter()
        .map(|(codes, _, description)| format!("{:<20}{}", codes.join(" / "), description))
        .collect()
}
