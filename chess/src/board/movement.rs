use super::pieces::{PieceData, PieceId};
use super::{Board, UndoState};
use crate::core::*;

/******************************************\
|==========================================|
|          Castling Rights Masks           |
|==========================================|
\******************************************/

/// Rights surviving a move touching each square. Moving the king or a rook
/// off its starting square, or capturing a rook on one, clears the matching
/// rights; every other square leaves them alone.
const fn init_castle_masks() -> [Castling; Square::NUM] {
    let mut table = [Castling::ALL; Square::NUM];

    table[Square::A1 as usize] = Castling(Castling::ALL.0 & !Castling::WQ.0);
    table[Square::H1 as usize] = Castling(Castling::ALL.0 & !Castling::WK.0);
    table[Square::E1 as usize] = Castling(Castling::ALL.0 & !Castling::WHITE_CASTLING.0);

    table[Square::A8 as usize] = Castling(Castling::ALL.0 & !Castling::BQ.0);
    table[Square::H8 as usize] = Castling(Castling::ALL.0 & !Castling::BK.0);
    table[Square::E8 as usize] = Castling(Castling::ALL.0 & !Castling::BLACK_CASTLING.0);

    table
}

const CASTLE_MASKS: [Castling; Square::NUM] = init_castle_masks();

/******************************************\
|==========================================|
|             Move Primitives              |
|==========================================|
\******************************************/

impl Board {
    /// Place a new piece, updating the arena, the square lookup and the
    /// occupancy boards. `None` when the colour's arena is full.
    #[inline]
    pub(crate) fn add_piece(&mut self, piece: Piece, square: Square) -> Option<PieceId> {
        debug_assert!(self.on(square).is_none(), "add_piece: 'square' is occupied");

        let col = piece.colour();
        let id = self.piece_set_mut(col).insert(piece.pt(), square)?;
        self.piece_board[square.index()] = Some(id);

        let pieces = &mut self.bitboards.side_mut(col).pieces;
        pieces.pt_bb_mut(piece.pt()).set(square);
        pieces.all_pieces.set(square);

        Some(id)
    }

    /// Take the piece off `square`, freeing its arena slot. The returned
    /// pair feeds [`Board::restore_piece`] on undo.
    #[inline]
    pub(crate) fn remove_piece(&mut self, square: Square) -> (PieceId, PieceData) {
        debug_assert!(self.on(square).is_some(), "remove_piece: 'square' is empty");
        let id = unsafe { self.piece_board[square.index()].unwrap_unchecked() };

        let col = id.colour();
        let data = self.piece_set_mut(col).remove(id);
        self.piece_board[square.index()] = None;

        let pieces = &mut self.bitboards.side_mut(col).pieces;
        pieces.pt_bb_mut(data.pt).clear(square);
        pieces.all_pieces.clear(square);

        (id, data)
    }

    /// Reinsert a captured piece into the arena slot it was removed from
    #[inline]
    pub(crate) fn restore_piece(&mut self, id: PieceId, data: PieceData) {
        debug_assert!(self.on(data.sq).is_none(), "restore_piece: 'square' is occupied");

        let col = id.colour();
        self.piece_set_mut(col).restore(id, data);
        self.piece_board[data.sq.index()] = Some(id);

        let pieces = &mut self.bitboards.side_mut(col).pieces;
        pieces.pt_bb_mut(data.pt).set(data.sq);
        pieces.all_pieces.set(data.sq);
    }

    /// Slide a piece from `from` to the empty square `to`
    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        debug_assert!(self.on(from).is_some(), "move_piece: 'from' square is empty");
        debug_assert!(self.on(to).is_none(), "move_piece: 'to' square is occupied");
        let id = unsafe { self.piece_board[from.index()].unwrap_unchecked() };

        let col = id.colour();
        let data = self.piece_set_mut(col).get_mut(id);
        let pt = data.pt;
        data.sq = to;

        self.piece_board[from.index()] = None;
        self.piece_board[to.index()] = Some(id);

        let pieces = &mut self.bitboards.side_mut(col).pieces;
        pieces.pt_bb_mut(pt).toggle(from);
        pieces.pt_bb_mut(pt).toggle(to);
        pieces.all_pieces.toggle(from);
        pieces.all_pieces.toggle(to);
    }

    /// Turn the pawn on `square` into `promo` in place, same arena slot
    #[inline]
    fn promote(&mut self, square: Square, promo: PieceType) {
        let id = unsafe { self.piece_board[square.index()].unwrap_unchecked() };
        let col = id.colour();

        let data = self.piece_set_mut(col).get_mut(id);
        debug_assert!(data.pt == PieceType::Pawn, "promotion of a non-pawn");
        data.pt = promo;

        let pieces = &mut self.bitboards.side_mut(col).pieces;
        pieces.pawns.clear(square);
        pieces.pt_bb_mut(promo).set(square);
    }

    /// Reverse a promotion: the piece on `square` becomes a pawn again
    #[inline]
    fn demote(&mut self, square: Square, promo: PieceType) {
        let id = unsafe { self.piece_board[square.index()].unwrap_unchecked() };
        let col = id.colour();

        let data = self.piece_set_mut(col).get_mut(id);
        debug_assert!(data.pt == promo, "demotion does not match the promotion");
        data.pt = PieceType::Pawn;

        let pieces = &mut self.bitboards.side_mut(col).pieces;
        pieces.pt_bb_mut(promo).clear(square);
        pieces.pawns.set(square);
    }

    /******************************************\
    |==========================================|
    |                 Castling                 |
    |==========================================|
    \******************************************/

    #[inline]
    fn rook_from(us: Colour, king_side: bool) -> Square {
        match king_side {
            true => Square::H1.relative(us),
            false => Square::A1.relative(us),
        }
    }

    #[inline]
    fn rook_to(us: Colour, king_side: bool) -> Square {
        match king_side {
            true => Square::F1.relative(us),
            false => Square::D1.relative(us),
        }
    }

    /// Relocate the rook after the king's two-square castle step
    #[inline]
    fn castle(&mut self, us: Colour, king_side: bool) {
        let rook_from = Self::rook_from(us, king_side);

        debug_assert!(
            self.on(rook_from) == Some(Piece::from_parts(us, PieceType::Rook)),
            "castling without a rook"
        );

        self.move_piece(rook_from, Self::rook_to(us, king_side));
    }

    #[inline]
    fn undo_castle(&mut self, us: Colour, king_side: bool) {
        self.move_piece(Self::rook_to(us, king_side), Self::rook_from(us, king_side));
    }

    #[inline]
    fn update_castle_rights(&mut self, from: Square, to: Square) {
        self.rights
            .mask(CASTLE_MASKS[from.index()] & CASTLE_MASKS[to.index()]);
    }

    /******************************************\
    |==========================================|
    |             Move Processing              |
    |==========================================|
    \******************************************/

    /// Play `m` on the board.
    ///
    /// `m` must come from `generate_moves` for this exact position; the hot
    /// path trusts it and only checks in debug builds. The snapshot is
    /// consistent again when this returns.
    pub fn make_move(&mut self, m: Move) {
        let from = m.from();
        let to = m.to();
        let us = self.stm();
        let flag = m.flag();

        debug_assert!(
            self.on(from).is_some_and(|p| p.colour() == us),
            "make_move: no friendly piece on 'from'"
        );
        let moving_pt = self.pieces[us.index()]
            .get(unsafe { self.piece_board[from.index()].unwrap_unchecked() })
            .pt;

        let mut undo = UndoState {
            rights: self.rights,
            fifty_move: self.fifty_move,
            enpassant: self.enpassant,
            captured: None,
        };

        self.enpassant = None;

        match flag {
            MoveFlag::QuietMove => {
                self.move_piece(from, to);
                self.update_castle_rights(from, to);
            }

            MoveFlag::DoublePawnPush => {
                // the capture square for the next ply is the one behind us
                self.enpassant = Some(from.add_unchecked(us.forward()));
                self.move_piece(from, to);
            }

            MoveFlag::KingCastle | MoveFlag::QueenCastle => {
                self.move_piece(from, to);
                self.castle(us, flag == MoveFlag::KingCastle);
                self.update_castle_rights(from, to);
            }

            MoveFlag::Capture => {
                undo.captured = Some(self.remove_piece(to));
                self.move_piece(from, to);
                self.update_castle_rights(from, to);
            }

            MoveFlag::EPCapture => {
                // the captured pawn is behind the landing square
                let cap_sq = to.add_unchecked(-us.forward());
                undo.captured = Some(self.remove_piece(cap_sq));
                self.move_piece(from, to);
            }

            MoveFlag::KnightPromo
            | MoveFlag::BishopPromo
            | MoveFlag::RookPromo
            | MoveFlag::QueenPromo => {
                self.promote(from, m.promotion_pt());
                self.move_piece(from, to);
                self.update_castle_rights(from, to);
            }

            MoveFlag::KnightPromoCapture
            | MoveFlag::BishopPromoCapture
            | MoveFlag::RookPromoCapture
            | MoveFlag::QueenPromoCapture => {
                undo.captured = Some(self.remove_piece(to));
                self.promote(from, m.promotion_pt());
                self.move_piece(from, to);
                self.update_castle_rights(from, to);
            }
        }

        if flag.is_capture() || flag.is_promotion() || moving_pt == PieceType::Pawn {
            self.fifty_move = 0;
        } else {
            self.fifty_move += 1;
        }

        self.moves.push(m);
        self.history.push(undo);
        self.halfmove += 1;

        self.update_masks();
    }

    /// Take back the last played move, restoring the position bit-exactly.
    pub fn unmake_move(&mut self) {
        debug_assert!(!self.moves.is_empty(), "unmake_move with no move played");
        let m = self.moves.pop().unwrap();
        let undo = self.history.pop().unwrap();

        self.halfmove -= 1;
        let us = self.stm();

        let from = m.from();
        let to = m.to();

        match m.flag() {
            MoveFlag::QuietMove | MoveFlag::DoublePawnPush => {
                self.move_piece(to, from);
            }

            MoveFlag::KingCastle | MoveFlag::QueenCastle => {
                self.move_piece(to, from);
                self.undo_castle(us, m.flag() == MoveFlag::KingCastle);
            }

            MoveFlag::Capture | MoveFlag::EPCapture => {
                self.move_piece(to, from);

                debug_assert!(
                    undo.captured.is_some(),
                    "unmake_move: capture flag without a captured piece"
                );
                let (id, data) = unsafe { undo.captured.unwrap_unchecked() };
                self.restore_piece(id, data);
            }

            MoveFlag::KnightPromo
            | MoveFlag::BishopPromo
            | MoveFlag::RookPromo
            | MoveFlag::QueenPromo => {
                self.move_piece(to, from);
                self.demote(from, m.promotion_pt());
            }

            MoveFlag::KnightPromoCapture
            | MoveFlag::BishopPromoCapture
            | MoveFlag::RookPromoCapture
            | MoveFlag::QueenPromoCapture => {
                self.move_piece(to, from);
                self.demote(from, m.promotion_pt());

                debug_assert!(
                    undo.captured.is_some(),
                    "unmake_move: capture flag without a captured piece"
                );
                let (id, data) = unsafe { undo.captured.unwrap_unchecked() };
                self.restore_piece(id, data);
            }
        }

        self.rights = undo.rights;
        self.enpassant = undo.enpassant;
        self.fifty_move = undo.fifty_move;

        self.update_masks();
    }

    /// Clone the board and play `m` on the copy
    pub fn simulate_move(&self, m: Move) -> Board {
        let mut next = self.clone();
        next.make_move(m);
        next
    }
}
