/// All semantic actions in kdesk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusPrevColumn,
    FocusNextColumn,
    SelectPrevTask,
    SelectNextTask,
    JumpToFirstTask,
    JumpToLastTask,

    // Task actions
    NewTask,
    EditSelectedTask,
    DeleteSelectedTask,
    ToggleMenu,
    GrabTask,
    MoveTaskPrevColumn,
    MoveTaskNextColumn,

    // Drag in progress
    DragPrevColumn,
    DragNextColumn,
    DragUp,
    DragDown,
    DragDrop,
    DragCancel,

    // Card menu
    MenuNext,
    MenuPrev,
    MenuSelect,
    MenuClose,

    // Form input
    InputConfirm,
    InputCancel,
    InputChar(char),
    InputBackspace,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    InputDeleteWord,
    InputNextField,
    InputPrevField,

    // Confirmation
    Confirm,
    Deny,

    // Board
    ReloadBoard,
    ShowHelp,
    ClosePanel,
    Quit,

    // No-op
    None,
}
