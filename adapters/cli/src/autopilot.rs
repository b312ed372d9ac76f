use neon_snake_core::{Direction, GameState, PlayerId};

/// Picks a heading that brings the player closer to its own fruit.
///
/// Reversing onto the neck is never chosen and headings that would land on a
/// rival fruit are avoided while another option exists. Returns `None` when
/// the current heading should be kept.
pub(crate) fn steer(state: &GameState, id: PlayerId) -> Option<Direction> {
    let player = state.player(id).filter(|player| player.alive)?;
    let head = player.head()?;
    let target = state
        .fruits
        .iter()
        .find(|fruit| fruit.kind == player.assigned_fruit)?;

    let (dx, dy) = state.grid.displacement(head, target.position);
    let horizontal = match dx.signum() {
        1 => Some(Direction::Right),
        -1 => Some(Direction::Left),
        _ => None,
    };
    let vertical = match dy.signum() {
        1 => Some(Direction::Down),
        -1 => Some(Direction::Up),
        _ => None,
    };
    let (first, second) = if dx.abs() >= dy.abs() {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };

    let safe = |direction: Direction| {
        let cell = state.grid.step(head, direction);
        direction != player.direction.opposite()
            && !state
                .fruits
                .iter()
                .any(|fruit| fruit.position == cell && fruit.kind != player.assigned_fruit)
    };

    let choice = first
        .into_iter()
        .chain(second)
        .chain([player.direction])
        .chain(Direction::ALL)
        .find(|direction| safe(*direction))?;
    (choice != player.direction).then_some(choice)
}
