//! "Perft" performance test: count the number of leaves at a given depth.
//! Useful for checking and timing the move generator.
//! See: http://www.aartbik.com/MISC/reversi.html
//!
//! Passes are folded into [`Game`]'s state, so a forced pass does not use up
//! a ply here. The two counts agree until passes appear (depth 9 on 8x8).

use crate::game::Game;

/// Count the leaves `depth` plies below the standard 8x8 start.
pub fn run_perft(depth: u64) -> u64 {
    leaves_below(&Game::default(), depth)
}

/// Count the leaves `depth` plies below `game`. A finished game is one leaf.
pub fn leaves_below(game: &Game, depth: u64) -> u64 {
    if depth == 0 {
        return 1;
    }

    let turn = match game.turn() {
        Some(turn) => turn,
        None => return 1,
    };

    game.board()
        .valid_moves(turn)
        .into_iter()
        .map(|mv| {
            let mut child = game.clone();
            child
                .place_disk_at(mv.x, mv.y)
                .expect("valid_moves returned an illegal move");
            leaves_below(&child, depth - 1)
        })
        .sum()
}
