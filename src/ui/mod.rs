// UI Layer
pub mod components;
pub mod theme;
pub mod theme_provider;

// Re-export theme types for convenience
pub use theme::{
    dark_theme, light_theme, ColorDef, ColorTokens, FontDef, SpacingTokens, Theme, ThemeRegistry,
    TokenValue, Typography,
};
pub use theme_provider::{use_app_theme, ThemeProvider};

// Re-export components
pub use components::{
    render_with_provider, ButtonOverrides, Component, CustomButton, CustomDropdown,
    CustomSearchBar, DropdownOption, EventOutcome, SimpleDropdown, TextInput,
};
