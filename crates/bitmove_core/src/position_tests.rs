use super::*;

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

fn fen(text: &str) -> Position {
    Position::from_fen(text).unwrap()
}

/// Play `mv` both ways and check the position comes back unchanged.
fn assert_roundtrip(pos: &Position, text: &str) -> Position {
    let mv = pos.parse_move(text).unwrap();
    let mut scratch = *pos;
    let undo = scratch.make_move(mv);
    let after = scratch;
    scratch.check_invariants().unwrap();
    scratch.unmake_move(mv, undo);
    assert_eq!(&scratch, pos, "unmake of {text} did not restore the position");
    after
}

// =============================================================================
// FEN
// =============================================================================

#[test]
fn test_startpos_matches_fen() {
    let pos = Position::startpos();
    assert_eq!(pos, fen(START_FEN));
    assert_eq!(pos.to_fen(), START_FEN);
    assert_eq!(pos.occupied().count_bits(), 32);
    pos.check_invariants().unwrap();
}

#[test]
fn test_fen_roundtrip() {
    for text in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
        "4k3/8/8/8/8/8/8/4K3 b - - 37 80",
    ] {
        assert_eq!(fen(text).to_fen(), text);
    }
}

#[test]
fn test_fen_optional_clocks() {
    let pos = fen("4k3/8/8/8/8/8/8/4K3 w - -");
    assert_eq!(pos.halfmove_clock(), 0);
    assert_eq!(pos.fullmove_number(), 1);
}

#[test]
fn test_fen_errors() {
    assert_eq!(
        Position::from_fen("8/8/8/8 w - -"),
        Err(FenError::WrongRankCount(4))
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3"),
        Err(FenError::MissingField("side to move"))
    );
    assert_eq!(
        Position::from_fen("4x3/8/8/8/8/8/8/4K3 w - -"),
        Err(FenError::InvalidPiece('x'))
    );
    assert!(matches!(
        Position::from_fen("4k4/8/8/8/8/8/8/4K3 w - -"),
        Err(FenError::WrongFileCount { rank: 8, .. })
    ));
    assert!(matches!(
        Position::from_fen("4k2/8/8/8/8/8/8/4K3 w - -"),
        Err(FenError::WrongFileCount { rank: 8, files: 7 })
    ));
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - -"),
        Err(FenError::InvalidSideToMove("x".into()))
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KX -"),
        Err(FenError::InvalidCastling('X'))
    );
    // e3 is a target only with Black to move
    assert_eq!(
        Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - e3"),
        Err(FenError::InvalidEnPassant("e3".into()))
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
        Err(FenError::InvalidHalfmoveClock("x".into()))
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra"),
        Err(FenError::TrailingField("extra".into()))
    );
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_piece_lookup() {
    let pos = Position::startpos();
    assert_eq!(
        pos.piece_at(Square::E1),
        Some(Piece::new(Color::White, PieceKind::King))
    );
    assert_eq!(
        pos.piece_at(Square::D8),
        Some(Piece::new(Color::Black, PieceKind::Queen))
    );
    assert_eq!(pos.piece_at(sq("e4")), None);
    assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
    assert_eq!(pos.pieces(Color::White, PieceKind::Pawn), Bitboard::RANK_2);
    assert_eq!(pos.kind_board(PieceKind::Pawn).count_bits(), 16);
}

#[test]
fn test_square_attacks() {
    let pos = fen("4k3/8/8/3p4/8/5N2/8/R3K3 w - - 0 1");
    // black pawn d5 attacks c4 and e4
    assert!(pos.is_square_attacked(sq("c4"), Color::Black));
    assert!(pos.is_square_attacked(sq("e4"), Color::Black));
    assert!(!pos.is_square_attacked(sq("d4"), Color::Black));
    // knight f3
    assert!(pos.is_square_attacked(sq("e5"), Color::White));
    // rook a1 along the first rank up to the king, along the a-file
    assert!(pos.is_square_attacked(sq("d1"), Color::White));
    assert!(pos.is_square_attacked(sq("a8"), Color::White));
    // king e8
    assert!(pos.is_square_attacked(sq("d7"), Color::Black));
}

#[test]
fn test_slider_attack_blocked() {
    let pos = fen("4k3/8/8/8/8/8/8/R1n1K3 b - - 0 1");
    assert!(pos.is_square_attacked(sq("c1"), Color::White));
    // d1 is covered by the king only; the c1 knight shields it from the rook
    assert!(pos.is_square_attacked(sq("d1"), Color::White));
    let no_king = fen("4k3/8/8/8/8/8/8/R1n5 b - - 0 1");
    assert!(!no_king.is_square_attacked(sq("d1"), Color::White));
}

#[test]
fn test_fifty_move_rule() {
    assert!(fen("8/8/8/4k3/8/4K3/8/8 w - - 100 60").is_fifty_move_draw());
    assert!(!fen("8/8/8/4k3/8/4K3/8/8 w - - 99 60").is_fifty_move_draw());
}

#[test]
fn test_invariant_violation_detected() {
    let mut pos = Position::startpos();
    pos.kinds[PieceKind::Knight.idx()] |= Bitboard::from_square(Square::A1);
    assert_eq!(
        pos.check_invariants(),
        Err(PositionError::OverlappingPieces(Square::A1))
    );

    let mut pos = Position::startpos();
    pos.hash ^= 1;
    assert!(matches!(
        pos.check_invariants(),
        Err(PositionError::HashMismatch { .. })
    ));
}

// =============================================================================
// Applying moves
// =============================================================================

#[test]
fn test_quiet_and_double_push() {
    let start = Position::startpos();
    let after = assert_roundtrip(&start, "e2e4");
    assert_eq!(after.en_passant(), Some(sq("e3")));
    assert_eq!(after.side_to_move(), Color::Black);
    assert_eq!(after.halfmove_clock(), 0);
    assert_eq!(after.fullmove_number(), 1);

    let after = assert_roundtrip(&after, "g8f6");
    assert_eq!(after.en_passant(), None);
    assert_eq!(after.halfmove_clock(), 1);
    assert_eq!(after.fullmove_number(), 2);
    assert_eq!(
        after.to_fen(),
        "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
    );
}

#[test]
fn test_capture_resets_clock() {
    let pos = fen("4k3/8/8/3p4/8/5N2/8/4K3 w - - 12 30");
    let after = assert_roundtrip(&pos, "f3e5");
    assert_eq!(after.halfmove_clock(), 13);
    let pos = fen("4k3/8/5p2/8/4N3/8/8/4K3 w - - 12 30");
    let after = assert_roundtrip(&pos, "e4f6");
    assert_eq!(after.halfmove_clock(), 0);
    assert_eq!(after.occupancy(Color::Black).count_bits(), 1);
}

#[test]
fn test_clocks_saturate_at_their_maximum() {
    let pos = fen("4k3/8/8/8/8/8/8/4K3 w - - 4294967295 1");
    let after = assert_roundtrip(&pos, "e1d1");
    assert_eq!(after.halfmove_clock(), u32::MAX);
    assert!(after.is_fifty_move_draw());

    let pos = fen("4k3/8/8/8/8/8/8/4K3 b - - 4294967295 4294967295");
    let after = assert_roundtrip(&pos, "e8d8");
    assert_eq!(after.halfmove_clock(), u32::MAX);
    assert_eq!(after.fullmove_number(), u32::MAX);
    assert_eq!(after.side_to_move(), Color::White);
}

#[test]
fn test_en_passant_removes_pawn() {
    let pos = fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
    let after = assert_roundtrip(&pos, "e5d6");
    assert_eq!(
        after.piece_at(sq("d6")),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
    assert_eq!(after.piece_at(sq("d5")), None);
    assert_eq!(after.pieces(Color::Black, PieceKind::Pawn), Bitboard::EMPTY);
}

#[test]
fn test_castle_moves_rook_and_clears_rights() {
    let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
    let after = assert_roundtrip(&pos, "e1g1");
    assert_eq!(
        after.piece_at(Square::F1),
        Some(Piece::new(Color::White, PieceKind::Rook))
    );
    assert_eq!(after.piece_at(Square::H1), None);
    assert_eq!(after.castling().to_string(), "kq");
    assert_eq!(after.halfmove_clock(), 4);

    let after = assert_roundtrip(&after, "e8c8");
    assert_eq!(
        after.piece_at(Square::D8),
        Some(Piece::new(Color::Black, PieceKind::Rook))
    );
    assert_eq!(after.castling(), CastlingRights::NONE);
}

#[test]
fn test_rook_moves_and_captures_drop_rights() {
    let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let after = assert_roundtrip(&pos, "a1a8");
    // white lost queen side by moving, black lost queen side by capture
    assert_eq!(after.castling().to_string(), "Kk");

    let after = assert_roundtrip(&pos, "h1h2");
    assert_eq!(after.castling().to_string(), "Qkq");
}

#[test]
fn test_promotion_replaces_pawn() {
    let pos = fen("r3k3/1P6/8/8/8/8/8/4K3 w q - 5 40");
    let after = assert_roundtrip(&pos, "b7a8n");
    assert_eq!(
        after.piece_at(Square::A8),
        Some(Piece::new(Color::White, PieceKind::Knight))
    );
    assert_eq!(after.pieces(Color::White, PieceKind::Pawn), Bitboard::EMPTY);
    assert_eq!(after.halfmove_clock(), 0);
    assert!(!after.castling().contains(CastlingRights::BLACK_QUEENSIDE));

    let after = assert_roundtrip(&pos, "b7b8q");
    assert_eq!(
        after.piece_at(Square::B8),
        Some(Piece::new(Color::White, PieceKind::Queen))
    );
}

#[test]
fn test_apply_leaves_original_untouched() {
    let pos = Position::startpos();
    let mv = pos.parse_move("g1f3").unwrap();
    let next = pos.apply(mv);
    assert_eq!(pos, Position::startpos());
    assert_ne!(next.hash(), pos.hash());
    assert_eq!(next.hash(), next.compute_hash());
}

#[test]
fn test_transposition_hashes_match() {
    let a = ["g1f3", "g8f6", "b1c3", "b8c6"];
    let b = ["b1c3", "b8c6", "g1f3", "g8f6"];
    let play = |line: &[&str]| {
        line.iter().fold(Position::startpos(), |pos, text| {
            pos.apply(pos.parse_move(text).unwrap())
        })
    };
    let (pa, pb) = (play(&a), play(&b));
    assert_eq!(pa.hash(), pb.hash());
    assert_eq!(pa, pb);
}

// =============================================================================
// Move text
// =============================================================================

#[test]
fn test_parse_move_roundtrip() {
    let pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    for mv in generate_pseudo_moves(&pos, pos.side_to_move()) {
        assert_eq!(pos.parse_move(&mv.to_string()), Ok(mv));
    }

    let promo = fen("r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
    for mv in generate_pseudo_moves(&promo, Color::White) {
        assert_eq!(promo.parse_move(&mv.to_string()), Ok(mv));
    }
    assert_eq!(
        promo.parse_move("b7b8Q").map(|m| m.kind()),
        Ok(MoveKind::QueenPromotion)
    );
}

#[test]
fn test_parse_move_errors() {
    let pos = Position::startpos();
    assert_eq!(
        pos.parse_move("e2"),
        Err(MoveParseError::Malformed("e2".into()))
    );
    assert_eq!(
        pos.parse_move("e2e9"),
        Err(MoveParseError::Malformed("e2e9".into()))
    );
    assert_eq!(
        pos.parse_move("e2e4k"),
        Err(MoveParseError::Malformed("e2e4k".into()))
    );
    assert_eq!(
        pos.parse_move("e2e5"),
        Err(MoveParseError::NotAvailable("e2e5".into()))
    );
    // promotion letter on a non-promoting move
    assert_eq!(
        pos.parse_move("e2e4q"),
        Err(MoveParseError::NotAvailable("e2e4q".into()))
    );
}

#[test]
fn test_display_board() {
    let text = Position::startpos().to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "8  r n b q k b n r");
    assert_eq!(lines[4], "4  . . . . . . . .");
    assert_eq!(lines[7], "1  R N B Q K B N R");
    assert_eq!(lines[8], "   a b c d e f g h");
}
