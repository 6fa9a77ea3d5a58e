use crate::Board;

/// Count the leaf nodes of the legal move tree to `depth`.
pub fn perft(board: &mut Board, depth: usize) -> usize {
    let move_list = board.generate_moves();

    if depth <= 1 {
        return move_list.len();
    }

    let mut nodes = 0;

    for move_ in move_list.iter() {
        board.make_move(*move_);
        nodes += perft(board, depth - 1);
        board.unmake_move();
    }

    nodes
}

/// Divide driver: print the node count under each root move.
pub fn perft_test(board: &mut Board, depth: usize) {
    use std::time::Instant;

    let move_list = board.generate_moves();

    println!("=============== PERFT TEST ===============");
    println!("                 Depth: {depth}           ");
    println!("==========================================");

    let mut total_nodes = 0;

    let start = Instant::now();

    for move_ in move_list.iter() {
        let nodes = if depth <= 1 {
            1
        } else {
            board.make_move(*move_);
            let nodes = perft(board, depth - 1);
            board.unmake_move();
            nodes
        };
        total_nodes += nodes;

        println!("              {move_}: {nodes}");
    }

    let time = start.elapsed().as_millis().max(1);

    println!("=========================================");
    println!("              Nodes: {total_nodes}       ");
    println!("              Time: {time}ms             ");
    println!(
        "              Mnps: {:0.1}Mnps",
        (total_nodes as f64 / time as f64 / 1000.0)
    );
    println!("=========================================");
}

/// The standard perft suite with known node counts per depth.
#[rustfmt::skip]
pub const PERFT_SUITE: &[(&str, &[usize])] = &[
    ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
     &[20, 400, 8902, 197_281, 4_865_609]),
    ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
     &[48, 2039, 97_862, 4_085_603, 193_690_690]),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
     &[14, 191, 2812, 43_238, 674_624]),
    ("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
     &[6, 264, 9467, 422_333, 15_833_292]),
    ("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
     &[44, 1486, 62_379, 2_103_487, 89_941_194]),
    ("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
     &[46, 2079, 89_890, 3_894_594, 164_075_551]),
];

/// Run the whole suite at full depth, printing a pass/fail line per entry.
pub fn perft_bench() -> bool {
    use std::time::Instant;

    let mut passed = true;
    println!("=============  START BENCH  =============");

    for (fen, counts) in PERFT_SUITE.iter() {
        let mut board = Board::from_fen(fen).unwrap();
        let depth = counts.len();
        let expected_nodes = counts[depth - 1];

        let start = Instant::now();
        let nodes = perft(&mut board, depth);
        let time = start.elapsed().as_millis().max(1);

        let status: &str = if nodes == expected_nodes {
            "PASSED"
        } else {
            passed = false;
            "FAILED"
        };

        println!(
            "status: {status}, time: {time:5}ms, Mnps: {:0.1}, Fen: {fen}",
            (nodes as f64 / time as f64 / 1000.0)
        )
    }

    passed
}
