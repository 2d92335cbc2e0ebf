//! Diagrams shared between tests

/// White king boxed in on a1: the queen checks along the first rank and
/// the rook covers the second
pub const CORNER_MATE: &str = concat!(
    ". . . . . . . k\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . r .\n",
    "K . . . . . . q\n",
    "\n",
    "turn - [ w ]\n",
);

/// The queen alone checks the king on a1, which can still step out
pub const CORNER_CHECK: &str = concat!(
    ". . . . . . . k\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    "K . . . . . . q\n",
    "\n",
    "turn - [ w ]\n",
);

/// White may castle short; the rook on d8 covers d1 so not long
pub const CASTLING: &str = concat!(
    ". . . r k . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    "R . . . K . . R\n",
    "\n",
    "turn - [ w ]\n",
    "castling - [ K Q ]\n",
);

/// The rook on d1 can take an undefended queen on d5
pub const HANGING_QUEEN: &str = concat!(
    "k . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . q . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    "K . . R . . . .\n",
    "\n",
    "turn - [ w ]\n",
);

pub const CHECKERS_START: &str = concat!(
    ". m . m . m . m\n",
    "m . m . m . m .\n",
    ". m . m . m . m\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    "M . M . M . M .\n",
    ". M . M . M . M\n",
    "M . M . M . M .\n",
    "\n",
    "turn - [ w ]\n",
);

/// Black to move must take d4 with the man on e5; a7 could otherwise slide
pub const CHECKERS_FORCED_CAPTURE: &str = concat!(
    ". . . . . . . .\n",
    "m . . . . . . .\n",
    ". . . . . . . .\n",
    ". . . . m . . .\n",
    ". . . M . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . M\n",
    ". . . . . . . .\n",
    "\n",
    "turn - [ b ]\n",
);

/// White's man on c3 jumps d4 then d6
pub const CHECKERS_DOUBLE_JUMP: &str = concat!(
    ". . . . . . . m\n",
    ". . . . . . . .\n",
    ". . . m . . . .\n",
    ". . . . . . . .\n",
    ". . . m . . . .\n",
    ". . M . . . . .\n",
    ". . . . . . . .\n",
    ". . . . . . . .\n",
    "\n",
    "turn - [ w ]\n",
);
