//! Match controller: placement phase, turn order, attack resolution and
//! win detection for a human player against the automated opponent.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::{
    board::{Board, BoardView},
    common::{GameError, GuessResult},
    config::GameConfig,
    placement::{self, PlacementProgress, PlacementSession},
    player_ai::AiPlayer,
    ship::Orientation,
};

/// One of the two fleets in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The human side.
    Player,
    /// The automated side.
    Opponent,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    PlacingShips,
    InProgress,
    Finished,
}

/// Everything a front end needs to render one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    /// Side whose grid was attacked.
    pub target: Side,
    pub row: usize,
    pub col: usize,
    pub result: GuessResult,
    /// Size of the ship that was hit, if any.
    pub ship_size: Option<usize>,
    pub game_over: bool,
    pub winner: Option<Side>,
}

impl AttackOutcome {
    pub fn hit(&self) -> bool {
        self.result.is_hit()
    }

    pub fn sunk(&self) -> bool {
        self.result == GuessResult::Sink
    }
}

/// A player attack and the opponent's reply, if the match went on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub player: AttackOutcome,
    pub reply: Option<AttackOutcome>,
}

/// Core game logic holding both boards and the opponent's targeting state.
pub struct GameEngine {
    config: GameConfig,
    rng: SmallRng,
    phase: GamePhase,
    placement: PlacementSession,
    player_board: Board,
    opponent_board: Board,
    ai: AiPlayer,
    target: Side,
    winner: Option<Side>,
    shots: [usize; 2],
}

impl GameEngine {
    /// Start a match whose randomness comes from `rng`.
    pub fn from_rng(config: GameConfig, mut rng: SmallRng) -> Result<Self, GameError> {
        let opponent_board = placement::auto_place(&config, &mut rng)?;
        log::info!(
            "new match on a {0}x{0} grid with fleet {1:?}",
            config.grid_size(),
            config.fleet()
        );
        Ok(Self::assemble(config, rng, Board::new(0), opponent_board))
    }

    fn assemble(config: GameConfig, rng: SmallRng, player_board: Board, opponent_board: Board) -> Self {
        Self {
            placement: PlacementSession::begin(&config),
            player_board,
            opponent_board,
            ai: AiPlayer::new(&config),
            config,
            rng,
            phase: GamePhase::PlacingShips,
            target: Side::Opponent,
            winner: None,
            shots: [0; 2],
        }
    }

    /// Start a reproducible match.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    /// Start a match seeded from the thread RNG.
    #[cfg(feature = "std")]
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::from_rng(config, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Start a match directly in progress on two finished boards.
    ///
    /// Both boards must be of the configured size and carry exactly the
    /// configured fleet, and neither may have been attacked yet.
    pub fn from_boards(
        config: GameConfig,
        player_board: Board,
        opponent_board: Board,
        rng: SmallRng,
    ) -> Result<Self, GameError> {
        for board in [&player_board, &opponent_board] {
            if board.size() != config.grid_size()
                || placement::fleet_sizes(board) != config.fleet_sorted()
            {
                return Err(GameError::InvalidConfig("board does not match the fleet manifest"));
            }
            if board.ships().iter().any(|s| s.hits() > 0) {
                return Err(GameError::WrongPhase);
            }
        }
        let mut engine = Self::assemble(config, rng, player_board, opponent_board);
        engine.phase = GamePhase::InProgress;
        Ok(engine)
    }

    /// Discard the current match and start a fresh one with `config`.
    pub fn new_match(&mut self, config: GameConfig) -> Result<(), GameError> {
        let opponent_board = placement::auto_place(&config, &mut self.rng)?;
        self.placement = PlacementSession::begin(&config);
        self.player_board = Board::new(0);
        self.opponent_board = opponent_board;
        self.ai = AiPlayer::new(&config);
        self.phase = GamePhase::PlacingShips;
        self.target = Side::Opponent;
        self.winner = None;
        self.shots = [0; 2];
        log::info!(
            "new match on a {0}x{0} grid with fleet {1:?}",
            config.grid_size(),
            config.fleet()
        );
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Winning side once the match is finished.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Side whose grid is attacked next.
    pub fn next_target(&self) -> Side {
        self.target
    }

    /// Number of attacks made against `target`'s grid.
    pub fn shots_fired(&self, target: Side) -> usize {
        self.shots[target as usize]
    }

    /// The opponent's targeting state.
    pub fn ai(&self) -> &AiPlayer {
        &self.ai
    }

    /// Size of the next ship to place, while placing.
    pub fn next_ship_size(&self) -> Option<usize> {
        match self.phase {
            GamePhase::PlacingShips => self.placement.next_size(),
            _ => None,
        }
    }

    /// Preview whether the next ship fits at (`row`, `col`).
    pub fn can_place(&self, row: usize, col: usize, orientation: Orientation) -> bool {
        self.phase == GamePhase::PlacingShips && self.placement.can_place(row, col, orientation)
    }

    /// Place the player's next ship.
    pub fn try_place(
        &mut self,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<PlacementProgress, GameError> {
        if self.phase != GamePhase::PlacingShips {
            return Err(GameError::WrongPhase);
        }
        let progress = self.placement.try_place(row, col, orientation)?;
        if progress == PlacementProgress::Complete {
            self.start()?;
        }
        Ok(progress)
    }

    /// Auto-place the player's whole fleet and start the match.
    pub fn randomize_placement(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::PlacingShips {
            return Err(GameError::WrongPhase);
        }
        self.placement.randomize(&mut self.rng)?;
        self.start()
    }

    /// Remove every ship placed so far.
    pub fn reset_placement(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::PlacingShips {
            return Err(GameError::WrongPhase);
        }
        self.placement.reset();
        Ok(())
    }

    fn start(&mut self) -> Result<(), GameError> {
        let session = PlacementSession::begin(&self.config);
        self.player_board = core::mem::replace(&mut self.placement, session).finish()?;
        self.phase = GamePhase::InProgress;
        log::info!("fleet placed, match started");
        Ok(())
    }

    fn board_mut(&mut self, side: Side) -> &mut Board {
        match side {
            Side::Player => &mut self.player_board,
            Side::Opponent => &mut self.opponent_board,
        }
    }

    /// Attack (`row`, `col`) on `target`'s grid.
    ///
    /// The player attacks [`Side::Opponent`] and the opponent attacks
    /// [`Side::Player`], strictly alternating. Rejected attacks change nothing.
    pub fn attack(&mut self, target: Side, row: usize, col: usize) -> Result<AttackOutcome, GameError> {
        match self.phase {
            GamePhase::PlacingShips => return Err(GameError::WrongPhase),
            GamePhase::Finished => return Err(GameError::MatchFinished),
            GamePhase::InProgress => {}
        }
        if target != self.target {
            return Err(GameError::OutOfTurn);
        }

        let board = self.board_mut(target);
        let report = board.receive_attack(row, col)?;
        let ship_size = report.ship.map(|i| board.ships()[i].size());
        let fleet_destroyed = board.all_sunk();

        if target == Side::Player {
            let recorded = self.ai.record_result(row, col, report.result);
            debug_assert!(recorded.is_ok(), "opponent belief out of sync: {:?}", recorded);
            if let Err(e) = recorded {
                log::error!("opponent belief out of sync at ({}, {}): {}", row, col, e);
            }
        }
        self.shots[target as usize] += 1;
        log::debug!("{:?} grid attacked at ({}, {}): {:?}", target, row, col, report.result);

        if fleet_destroyed {
            self.phase = GamePhase::Finished;
            self.winner = Some(target.other());
            log::info!(
                "{:?} wins after {} shots",
                target.other(),
                self.shots[target as usize]
            );
        } else {
            self.target = target.other();
        }

        Ok(AttackOutcome {
            target,
            row,
            col,
            result: report.result,
            ship_size,
            game_over: fleet_destroyed,
            winner: self.winner,
        })
    }

    /// Let the automated side pick a cell and fire at the player's grid.
    pub fn opponent_turn(&mut self) -> Result<AttackOutcome, GameError> {
        match self.phase {
            GamePhase::PlacingShips => return Err(GameError::WrongPhase),
            GamePhase::Finished => return Err(GameError::MatchFinished),
            GamePhase::InProgress => {}
        }
        if self.target != Side::Player {
            return Err(GameError::OutOfTurn);
        }
        let (row, col) = self
            .ai
            .next_attack(&mut self.rng)
            .ok_or(GameError::BoardExhausted)?;
        self.attack(Side::Player, row, col)
    }

    /// Player attack followed, unless it ended the match, by the reply.
    pub fn play_turn(&mut self, row: usize, col: usize) -> Result<Turn, GameError> {
        let player = self.attack(Side::Opponent, row, col)?;
        let reply = if player.game_over {
            None
        } else {
            Some(self.opponent_turn()?)
        };
        Ok(Turn { player, reply })
    }

    /// The player's own grid, ships shown.
    pub fn player_view(&self) -> BoardView {
        self.player_board().view(true)
    }

    /// The opponent's grid; ships stay hidden until the match is over.
    pub fn opponent_view(&self) -> BoardView {
        self.opponent_board.view(self.phase == GamePhase::Finished)
    }

    /// The player's board; while placing, the layout so far.
    pub fn player_board(&self) -> &Board {
        match self.phase {
            GamePhase::PlacingShips => self.placement.board(),
            _ => &self.player_board,
        }
    }
}
