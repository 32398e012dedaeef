//! One game table: seats, votes, tokens, flags, and role assignment.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use barricade_assign::{assign, PreferenceRanking};
use barricade_protocol::{
    FlagColor, FlagView, GameId, GamePhase, GameView, PlayerId, PlayerView,
    Role, TokenKind, TokenView, UserId, ROLE_COUNT,
};

use crate::{
    GameError, INFLUENCE_TOKENS_START, SHARD_TOKENS_MAX, SHARD_TOKENS_START,
};

/// Process-wide counters for entity ids.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_FLAG_ID: AtomicU64 = AtomicU64::new(1);

/// Name and color a user picks when sitting down.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub name: String,
    pub color: String,
}

/// A table token. `owner` is whose token it originally is; `holder` is
/// who currently has it in front of them and may play it.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub id: u64,
    pub kind: TokenKind,
    pub owner: PlayerId,
    pub holder: PlayerId,
}

/// A flag planted by a player.
#[derive(Debug, Clone)]
pub struct Flag {
    pub id: u64,
    pub color: FlagColor,
    /// Unix timestamp in milliseconds.
    pub planted_at: u64,
}

/// One seat at the table.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub user_id: UserId,
    pub name: String,
    pub color: String,
    /// Assigned role once the optimizer has run.
    pub role: Option<Role>,
    /// The player's submitted preference ranking, may be empty.
    pub ranking: Vec<Role>,
    pub flags: Vec<Flag>,
}

/// One running game.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    join_code: String,
    phase: GamePhase,
    nb_votes: u32,
    nb_available_shard_tokens: u32,
    players: Vec<Player>,
    tokens: Vec<Token>,
}

impl Game {
    pub(crate) fn new(id: GameId, join_code: String) -> Self {
        Self {
            id,
            join_code,
            phase: GamePhase::Start,
            nb_votes: 0,
            nb_available_shard_tokens: SHARD_TOKENS_MAX - SHARD_TOKENS_START,
            players: Vec::new(),
            tokens: Vec::new(),
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn join_code(&self) -> &str {
        &self.join_code
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The seat belonging to `user`, if any.
    pub fn player_of(&self, user: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user)
    }

    fn player_of_mut(&mut self, user: UserId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.user_id == user)
    }

    /// Seats a user, or returns their existing seat (idempotent join).
    /// New players bring their influence tokens to the table.
    pub(crate) fn seat(
        &mut self,
        user: UserId,
        profile: &PlayerProfile,
    ) -> PlayerId {
        if let Some(player) = self.player_of(user) {
            return player.id;
        }

        let player_id =
            PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
        self.players.push(Player {
            id: player_id,
            user_id: user,
            name: profile.name.clone(),
            color: profile.color.clone(),
            role: None,
            ranking: Vec::new(),
            flags: Vec::new(),
        });
        for _ in 0..INFLUENCE_TOKENS_START {
            self.tokens.push(Token {
                id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
                kind: TokenKind::Influence,
                owner: player_id,
                holder: player_id,
            });
        }

        tracing::info!(game = %self.id, player = %player_id, %user, "player seated");
        player_id
    }

    /// Removes the user's seat. Their own tokens leave the table with
    /// them; tokens they merely held go back in front of their owners.
    pub(crate) fn remove_player(&mut self, user: UserId) -> Result<(), GameError> {
        let Some(player) = self.player_of(user) else {
            return Err(GameError::NotInGame(user, self.id));
        };
        let player_id = player.id;

        self.players.retain(|p| p.id != player_id);
        self.tokens.retain(|t| t.owner != player_id);
        for token in &mut self.tokens {
            if token.holder == player_id {
                token.holder = token.owner;
            }
        }

        tracing::info!(game = %self.id, player = %player_id, "player left");
        Ok(())
    }

    pub(crate) fn add_vote(&mut self) {
        self.nb_votes += 1;
    }

    pub(crate) fn reset_votes(&mut self) {
        self.nb_votes = 0;
    }

    pub(crate) fn close(&mut self) {
        self.phase = GamePhase::Done;
        tracing::info!(game = %self.id, "game closed");
    }

    /// Passes one influence token from `from_user`'s pile to `to_player`.
    ///
    /// A token *owned by the recipient* goes back first; only when the
    /// giver holds none of those do they part with one of their own.
    pub(crate) fn give_token(
        &mut self,
        from_user: UserId,
        to_player: PlayerId,
    ) -> Result<(), GameError> {
        let giver = self
            .player_of(from_user)
            .ok_or(GameError::NotInGame(from_user, self.id))?
            .id;
        if !self.players.iter().any(|p| p.id == to_player) {
            return Err(GameError::NoSuchPlayer(self.id));
        }

        let held = |t: &Token| {
            t.holder == giver && t.kind == TokenKind::Influence
        };
        let token = self
            .tokens
            .iter()
            .filter(|t| held(t))
            .find(|t| t.owner == to_player)
            .map(|t| t.id)
            .or_else(|| {
                self.tokens
                    .iter()
                    .find(|t| held(t) && t.owner == giver)
                    .map(|t| t.id)
            })
            .ok_or(GameError::NoTokenToGive)?;

        if let Some(t) = self.tokens.iter_mut().find(|t| t.id == token) {
            t.holder = to_player;
        }
        tracing::debug!(game = %self.id, token, from = %giver, to = %to_player, "token passed");
        Ok(())
    }

    /// Plants a flag in front of the user's seat.
    pub(crate) fn plant_flag(
        &mut self,
        user: UserId,
        color: FlagColor,
    ) -> Result<(), GameError> {
        let game_id = self.id;
        let player = self
            .player_of_mut(user)
            .ok_or(GameError::NotInGame(user, game_id))?;
        player.flags.push(Flag {
            id: NEXT_FLAG_ID.fetch_add(1, Ordering::Relaxed),
            color,
            planted_at: now_millis(),
        });
        Ok(())
    }

    /// Stores the user's preference ranking, replacing any previous one.
    pub(crate) fn save_ranking(
        &mut self,
        user: UserId,
        ranking: Vec<Role>,
    ) -> Result<(), GameError> {
        if ranking.len() > ROLE_COUNT {
            return Err(GameError::InvalidRanking(format!(
                "{} entries, pool has {ROLE_COUNT}",
                ranking.len()
            )));
        }
        let distinct: HashSet<Role> = ranking.iter().copied().collect();
        if distinct.len() != ranking.len() {
            return Err(GameError::InvalidRanking(
                "duplicate roles".to_owned(),
            ));
        }

        let game_id = self.id;
        let player = self
            .player_of_mut(user)
            .ok_or(GameError::NotInGame(user, game_id))?;
        player.ranking = ranking;
        Ok(())
    }

    /// Changes the color of the user's seat.
    pub(crate) fn change_color(
        &mut self,
        user: UserId,
        color: String,
    ) -> Result<(), GameError> {
        let game_id = self.id;
        let player = self
            .player_of_mut(user)
            .ok_or(GameError::NotInGame(user, game_id))?;
        player.color = color;
        Ok(())
    }

    /// Runs the assignment optimizer over the seated players' rankings
    /// (stable seating order) and persists the resulting roles.
    pub(crate) fn assign_roles(&mut self) -> Result<(), GameError> {
        let rankings: Vec<PreferenceRanking> = self
            .players
            .iter()
            .map(|p| PreferenceRanking::new(p.ranking.clone()))
            .collect();

        let assignment = assign(&rankings)?;
        for (player, role) in
            self.players.iter_mut().zip(assignment.roles())
        {
            player.role = Some(*role);
            tracing::info!(game = %self.id, player = %player.id, role = %role, "role assigned");
        }
        if !self.players.is_empty() {
            self.phase = GamePhase::OnGoing;
        }
        Ok(())
    }

    /// Renders the full client-facing view. `is_me` is set on the
    /// viewer's own seat when a viewer is given.
    pub fn render(&self, viewer: Option<UserId>) -> GameView {
        let players = self
            .players
            .iter()
            .map(|p| self.render_player(p, viewer))
            .collect();
        let flags = self
            .players
            .iter()
            .flat_map(|p| p.flags.iter().map(|f| render_flag(p.id, f)))
            .collect();

        GameView {
            id: self.id,
            join_code: self.join_code.clone(),
            phase: self.phase,
            nb_votes: self.nb_votes,
            nb_available_shard_tokens: self.nb_available_shard_tokens,
            players,
            flags,
        }
    }

    fn render_player(&self, player: &Player, viewer: Option<UserId>) -> PlayerView {
        let tokens_where = |pred: &dyn Fn(&Token) -> bool| {
            self.tokens
                .iter()
                .filter(|t| pred(t))
                .map(|t| TokenView {
                    id: t.id,
                    kind: t.kind,
                    owner: t.owner,
                })
                .collect::<Vec<_>>()
        };

        PlayerView {
            id: player.id,
            user_id: player.user_id,
            name: player.name.clone(),
            color: player.color.clone(),
            role: player.role,
            ranking: player.ranking.clone(),
            playable_tokens: tokens_where(&|t| t.holder == player.id),
            my_tokens: tokens_where(&|t| t.owner == player.id),
            flags: player
                .flags
                .iter()
                .map(|f| render_flag(player.id, f))
                .collect(),
            is_me: viewer == Some(player.user_id),
        }
    }
}

fn render_flag(player: PlayerId, flag: &Flag) -> FlagView {
    FlagView {
        id: flag.id,
        player,
        color: flag.color,
        planted_at: flag.planted_at,
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
