//! Sane terminal defaults for a freshly claimed console.
//!
//! The values follow what sysvinit-era inits install on the system console:
//! keep the line speed and character framing, reset everything else.

use nix::sys::termios::{
    ControlFlags, InputFlags, LocalFlags, OutputFlags, SpecialCharacterIndices, Termios,
};

/// Canonical control characters as (index, value) pairs
pub const CONTROL_CHARS: [(SpecialCharacterIndices, libc::cc_t); 10] = [
    (SpecialCharacterIndices::VINTR, 3),    // ^C
    (SpecialCharacterIndices::VQUIT, 28),   // ^\
    (SpecialCharacterIndices::VERASE, 127), // DEL
    (SpecialCharacterIndices::VKILL, 24),   // ^X
    (SpecialCharacterIndices::VEOF, 4),     // ^D
    (SpecialCharacterIndices::VTIME, 0),
    (SpecialCharacterIndices::VMIN, 1),
    (SpecialCharacterIndices::VSTART, 17), // ^Q
    (SpecialCharacterIndices::VSTOP, 19),  // ^S
    (SpecialCharacterIndices::VSUSP, 26),  // ^Z
];

/// Control bits that survive a reset: line speed and character framing
pub fn preserved_control_flags() -> ControlFlags {
    ControlFlags::from_bits_retain(
        libc::CBAUD | libc::CBAUDEX | libc::CSIZE | libc::CSTOPB | libc::PARENB | libc::PARODD,
    )
}

pub fn forced_control_flags() -> ControlFlags {
    ControlFlags::HUPCL | ControlFlags::CLOCAL | ControlFlags::CREAD
}

pub fn sane_input_flags() -> InputFlags {
    InputFlags::IGNPAR | InputFlags::ICRNL | InputFlags::IXON | InputFlags::IXANY
}

pub fn sane_output_flags() -> OutputFlags {
    OutputFlags::OPOST | OutputFlags::ONLCR
}

pub fn sane_local_flags() -> LocalFlags {
    LocalFlags::ISIG
        | LocalFlags::ICANON
        | LocalFlags::ECHO
        | LocalFlags::ECHOCTL
        | LocalFlags::ECHOPRT
        | LocalFlags::ECHOKE
}

/// Rewrite `tty` in place to the canonical console settings.
pub fn sanitize_termios(tty: &mut Termios) {
    tty.control_flags &= preserved_control_flags();
    tty.control_flags |= forced_control_flags();

    for (index, value) in CONTROL_CHARS {
        tty.control_chars[index as usize] = value;
    }

    tty.input_flags = sane_input_flags();
    tty.output_flags = sane_output_flags();
    tty.local_flags = sane_local_flags();
}
