// crates/nim-core/tests/rules.rs
use nim_core::{
    Board, BoardError, Cell, EndReason, Game, Move, MoveError, Seat, BOARD_CELLS, COLS,
    HEAP_SIZES, ROWS,
};

/// Every reachable board: each heap anywhere from empty to its starting size.
fn all_boards() -> Vec<Board> {
    let mut boards = Vec::new();
    for a in 0..=HEAP_SIZES[0] {
        for b in 0..=HEAP_SIZES[1] {
            for c in 0..=HEAP_SIZES[2] {
                for d in 0..=HEAP_SIZES[3] {
                    boards.push(Board::from_heaps([a, b, c, d]).unwrap());
                }
            }
        }
    }
    boards
}

#[test]
fn initial_board_has_heaps_1_3_5_7() {
    let board = Board::new();
    assert_eq!(board.heaps(), [1, 3, 5, 7]);
    assert_eq!(board.stones(), 16);
    assert!(!board.is_empty());

    let expected = b"OXXXXXXOOOXXXXOOOOOXXOOOOOOO";
    let actual: Vec<u8> = board.cells().iter().map(|c| c.as_byte()).collect();
    assert_eq!(&actual[..], &expected[..]);
}

#[test]
fn legality_and_effect_hold_for_every_board() {
    let boards = all_boards();
    assert_eq!(boards.len(), 2 * 4 * 6 * 8);

    for board in &boards {
        for row in 0..=9u8 {
            for col in 0..=9u8 {
                if row == 0 && col == 0 {
                    continue;
                }
                let mv = Move::take(row, col);
                let in_range = (1..=4).contains(&row) && (1..=7).contains(&col);
                let idx = 7 * (row as usize).saturating_sub(1) + (col as usize).saturating_sub(1);
                let legal = in_range && board.cells()[idx] == Cell::Occupied;

                assert_eq!(board.validate(mv).is_ok(), legal, "{:?} on {:?}", mv, board.heaps());

                let mut after = board.clone();
                let applied = after.apply(mv);
                if !legal {
                    assert!(applied.is_err());
                    assert_eq!(&after, board, "rejected move must not change the board");
                    continue;
                }
                assert!(applied.is_ok());

                let start = 7 * (row as usize - 1) + col as usize - 1;
                let end = 7 * row as usize;
                for i in 0..BOARD_CELLS {
                    if (start..end).contains(&i) {
                        assert_eq!(after.cells()[i], Cell::Removed);
                    } else {
                        assert_eq!(after.cells()[i], board.cells()[i]);
                    }
                }
                assert_eq!(after.heap(row), col as usize - 1);
                assert!(after.heap(row) < board.heap(row));
            }
        }
    }
}

#[test]
fn row_four_column_one_clears_bottom_heap_only() {
    let mut board = Board::new();
    board.apply(Move::take(4, 1)).unwrap();

    for i in 21..28 {
        assert_eq!(board.cells()[i], Cell::Removed);
    }
    assert_eq!(board.heaps(), [1, 3, 5, 0]);
}

#[test]
fn out_of_range_moves_report_which_coordinate() {
    let board = Board::new();
    assert_eq!(board.validate(Move::take(5, 1)), Err(MoveError::RowOutOfRange(5)));
    assert_eq!(board.validate(Move::take(0, 3)), Err(MoveError::RowOutOfRange(0)));
    assert_eq!(board.validate(Move::take(2, 8)), Err(MoveError::ColumnOutOfRange(8)));
    assert_eq!(
        board.validate(Move::take(1, 2)),
        Err(MoveError::CellRemoved { row: 1, col: 2 })
    );
}

#[test]
fn from_cells_rejects_gaps_and_stones_outside_heaps() {
    let mut cells = *Board::new().cells();
    cells[COLS + 1] = Cell::Removed; // row 2: O X O
    assert_eq!(Board::from_cells(cells), Err(BoardError::Gap { row: 2 }));

    let mut cells = *Board::new().cells();
    cells[1] = Cell::Occupied; // row 1 only ever holds one stone
    assert_eq!(
        Board::from_cells(cells),
        Err(BoardError::OutsideHeap { row: 1, col: 2 })
    );

    for board in all_boards() {
        assert_eq!(Board::from_cells(*board.cells()).as_ref(), Ok(&board));
    }
}

#[test]
fn first_seat_moves_on_odd_turns() {
    let mut game = Game::new();
    assert_eq!(game.turn(), 1);
    assert_eq!(game.mover(), Seat::First);

    game.play(Move::take(4, 7)).unwrap();
    assert_eq!(game.turn(), 2);
    assert_eq!(game.mover(), Seat::Second);

    game.play(Move::take(3, 5)).unwrap();
    assert_eq!(game.mover(), Seat::First);
}

#[test]
fn illegal_move_leaves_game_untouched() {
    let mut game = Game::new();
    let err = game.play(Move::take(1, 4)).unwrap_err();
    assert_eq!(err, MoveError::CellRemoved { row: 1, col: 4 });
    assert_eq!(game.turn(), 1);
    assert_eq!(game.board(), &Board::new());
}

#[test]
fn resignation_loses_regardless_of_stones_left() {
    let mut game = Game::new();
    game.play(Move::take(4, 3)).unwrap();
    game.play(Move::Resign).unwrap();

    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.loser, Seat::Second);
    assert_eq!(outcome.winner, Seat::First);
    assert_eq!(outcome.reason, EndReason::Resigned);
    assert!(game.board().stones() > 0);

    assert_eq!(game.play(Move::take(1, 1)), Err(MoveError::GameOver));
}

#[test]
fn taking_the_last_stone_loses() {
    let mut game = Game::new();
    for mv in [
        Move::take(1, 1),
        Move::take(2, 1),
        Move::take(3, 1),
        Move::take(4, 1),
    ] {
        assert!(game.outcome().is_none());
        game.play(mv).unwrap();
    }

    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.loser, Seat::Second);
    assert_eq!(outcome.winner, Seat::First);
    assert_eq!(outcome.reason, EndReason::Exhausted);
}

#[test]
fn last_mover_loses_from_every_reachable_board() {
    // Play each board out two ways (always take one stone from the first
    // non-empty row, or always clear the last non-empty row) and check the
    // seat that emptied the board is the loser.
    for start in all_boards() {
        if start.is_empty() {
            continue;
        }
        for clear_row in [false, true] {
            let mut game = Game::from_board(start.clone());
            let mut last_mover = None;

            while !game.is_over() {
                let heaps = game.board().heaps();
                let mv = if clear_row {
                    let row = (0..ROWS).rev().find(|&r| heaps[r] > 0).unwrap();
                    Move::take(row as u8 + 1, 1)
                } else {
                    let row = (0..ROWS).find(|&r| heaps[r] > 0).unwrap();
                    Move::take(row as u8 + 1, heaps[row] as u8)
                };
                last_mover = Some(game.mover());
                game.play(mv).unwrap();
            }

            let outcome = game.outcome().unwrap();
            assert_eq!(Some(outcome.loser), last_mover);
            assert_eq!(outcome.winner, outcome.loser.other());
            assert_eq!(outcome.reason, EndReason::Exhausted);
        }
    }
}

#[test]
fn resign_round_trips_through_coords() {
    assert_eq!(Move::from_coords(0, 0), Move::Resign);
    assert_eq!(Move::Resign.coords(), (0, 0));
    assert_eq!(Move::from_coords(3, 2), Move::take(3, 2));
    assert!(!Move::take(3, 2).is_resignation());
}

#[test]
fn board_renders_rows_and_column_ruler() {
    let text = Board::new().to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "row");
    assert_eq!(lines[1].trim_end(), "1| O");
    assert_eq!(lines[4].trim_end(), "4| O O O O O O O");
    assert_eq!(lines[5], " +-----------------");
    assert_eq!(lines[6], "   1 2 3 4 5 6 7 col");
}
