// Extended window style composition for the Win32 style-bit strategy.
//
// The bits live here rather than in the Win32 adapter so the composition
// rules can be checked on every host.

/// `WS_EX_TRANSPARENT`: pointer input falls through to the window beneath.
pub const WS_EX_TRANSPARENT: isize = 0x0000_0020;

/// `WS_EX_LAYERED`: the compositor owns the window surface.
pub const WS_EX_LAYERED: isize = 0x0008_0000;

/// Computes the extended style to write back for the requested mode.
///
/// Entering click-through sets both bits. Leaving clears only the transparent
/// bit; the layered bit stays, dropping it makes the window flash opaque.
pub fn compose_ex_style(current: isize, click_through: bool) -> isize {
    if click_through {
        current | WS_EX_LAYERED | WS_EX_TRANSPARENT
    } else {
        (current & !WS_EX_TRANSPARENT) | WS_EX_LAYERED
    }
}

/// True when `style` has both bits needed for input pass-through.
pub fn is_click_through(style: isize) -> bool {
    style & WS_EX_TRANSPARENT != 0 && style & WS_EX_LAYERED != 0
}
