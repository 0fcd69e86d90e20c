//! Relationship index mutations.
//!
//! Following and liking are each stored as two one-directional index tables.
//! A single logical change produces a forward entry and its inverse, which a
//! repository must apply together and in the given order.

use super::{GameId, UserId};

/// One entry written to a relationship index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationMutation {
    /// `user` now follows `followed`.
    Follow { user: UserId, followed: UserId },
    /// `user` gained `follower`.
    FollowedBy { user: UserId, follower: UserId },
    /// `user` likes `game`.
    Like { user: UserId, game: GameId },
    /// `game` is liked by `user`.
    LikedBy { game: GameId, user: UserId },
}

impl RelationMutation {
    /// Forward-then-inverse pair recording that `user` follows `followed`.
    pub const fn follow_pair(user: UserId, followed: UserId) -> [Self; 2] {
        [
            Self::Follow { user, followed },
            Self::FollowedBy {
                user: followed,
                follower: user,
            },
        ]
    }

    /// Forward-then-inverse pair recording that `user` likes `game`.
    pub const fn like_pair(user: UserId, game: GameId) -> [Self; 2] {
        [Self::Like { user, game }, Self::LikedBy { game, user }]
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn follow_pair_puts_forward_entry_first() {
        let [forward, inverse] = RelationMutation::follow_pair(UserId::new(1), UserId::new(2));
        assert_eq!(
            forward,
            RelationMutation::Follow {
                user: UserId::new(1),
                followed: UserId::new(2),
            }
        );
        assert_eq!(
            inverse,
            RelationMutation::FollowedBy {
                user: UserId::new(2),
                follower: UserId::new(1),
            }
        );
    }

    #[test]
    fn like_pair_puts_forward_entry_first() {
        let [forward, inverse] = RelationMutation::like_pair(UserId::new(1), GameId::new(7));
        assert!(matches!(forward, RelationMutation::Like { .. }));
        assert!(matches!(inverse, RelationMutation::LikedBy { .. }));
    }
}
