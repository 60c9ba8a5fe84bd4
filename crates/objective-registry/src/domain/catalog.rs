//! Objective codes and the roles offered by the game client.

/// Roles the client offers at creation. The registry accepts any non-empty role.
pub const STANDARD_ROLES: [&str; 5] = ["Werewolf", "Villager", "Seer", "Hunter", "Witch"];

/// Description shown for codes outside the catalog.
pub const UNKNOWN_OBJECTIVE: &str = "Unknown objective";

const OBJECTIVES: [(u8, &str); 8] = [
    (1, "Protect a specific player until night 3"),
    (2, "Get yourself voted out on day 2"),
    (3, "Successfully identify the Seer"),
    (4, "Survive until the end without being revealed"),
    (5, "Cause a specific player to be voted out"),
    (6, "Use your special ability on the correct target"),
    (7, "Make at least 3 incorrect accusations"),
    (8, "Get at least 2 players to trust you falsely"),
];

/// Human-readable description of an objective code.
#[must_use]
pub fn describe_objective(code: f64) -> &'static str {
    OBJECTIVES
        .iter()
        .find(|(known, _)| f64::from(*known) == code)
        .map_or(UNKNOWN_OBJECTIVE, |(_, text)| text)
}

/// Returns true if `role` is one of [`STANDARD_ROLES`].
#[must_use]
pub fn is_standard_role(role: &str) -> bool {
    STANDARD_ROLES.contains(&role)
}
