//! Events emitted by the step function, one batch per tick.
//!
//! The simulation never touches audio or the terminal; it reports what
//! happened and the presentation layer decides what that sounds like.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// The character left the ground.
    Jump,
    /// A coin was picked up and the meter moved.
    CoinCollected,
    /// A bottle left the character's hand.
    BottleThrown,
    /// A chicken was stomped.
    EnemyKilled,
    /// A bottle connected with the boss.
    BossHurt,
    /// The boss's removal delay expired; the session is won.
    BossDead,
    /// Energy hit zero; the session is ending.
    CharacterDead,
}
