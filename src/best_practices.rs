use crate::store::{Action, State};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestPracticesState {
    pub progress_bar: bool,
    pub ar_button: bool,
    pub ar_prompt: bool,
}

impl Default for BestPracticesState {
    fn default() -> Self {
        Self {
            progress_bar: true,
            ar_button: true,
            ar_prompt: true,
        }
    }
}

/// Children the exported element carries besides hotspots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildElement {
    ProgressBar { is_editor: bool },
    ArButton,
    ArPrompt,
}

impl ChildElement {
    pub fn to_html(self) -> &'static str {
        match self {
            Self::ProgressBar { is_editor: true } => {
                r#"<div class="progress-bar hide" slot="progress-bar"><div class="update-bar"></div></div>"#
            }
            Self::ProgressBar { is_editor: false } => {
                r#"<div class="progress-bar" slot="progress-bar"><div class="update-bar"></div></div>"#
            }
            Self::ArButton => r#"<button slot="ar-button" id="ar-button">View in your space</button>"#,
            Self::ArPrompt => {
                r#"<div id="ar-prompt"><img src="https://modelviewer.dev/shared-assets/icons/hand.png"></div>"#
            }
        }
    }
}

/// The AR affordances only make sense on the published page, never inside
/// the editor preview.
pub fn common_child_elements(
    best_practices: &BestPracticesState,
    is_editor: bool,
) -> Vec<ChildElement> {
    let mut children = Vec::new();
    if best_practices.progress_bar {
        children.push(ChildElement::ProgressBar { is_editor });
    }
    if best_practices.ar_button && !is_editor {
        children.push(ChildElement::ArButton);
    }
    if best_practices.ar_prompt && !is_editor {
        children.push(ChildElement::ArPrompt);
    }
    children
}

pub fn dispatch_progress_bar(enabled: bool) -> Action {
    Action::SetProgressBar(enabled)
}

pub fn dispatch_ar_button(enabled: bool) -> Action {
    Action::SetArButton(enabled)
}

pub fn dispatch_ar_prompt(enabled: bool) -> Action {
    Action::SetArPrompt(enabled)
}

pub fn get_best_practices(state: &State) -> &Rc<BestPracticesState> {
    &state.best_practices
}

pub fn best_practices_reducer(
    state: &Rc<BestPracticesState>,
    action: &Action,
) -> Rc<BestPracticesState> {
    let mut next = **state;
    match action {
        Action::SetProgressBar(enabled) => next.progress_bar = *enabled,
        Action::SetArButton(enabled) => next.ar_button = *enabled,
        Action::SetArPrompt(enabled) => next.ar_prompt = *enabled,
        _ => return Rc::clone(state),
    }
    Rc::new(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::strategies;
    use proptest::prelude::*;

    #[test]
    fn editor_hides_ar_children() {
        let all = BestPracticesState::default();
        assert_eq!(
            common_child_elements(&all, true),
            vec![ChildElement::ProgressBar { is_editor: true }]
        );
        assert_eq!(
            common_child_elements(&all, false),
            vec![
                ChildElement::ProgressBar { is_editor: false },
                ChildElement::ArButton,
                ChildElement::ArPrompt,
            ]
        );
    }

    #[test]
    fn disabled_practices_render_nothing() {
        let none = BestPracticesState {
            progress_bar: false,
            ar_button: false,
            ar_prompt: false,
        };
        assert!(common_child_elements(&none, false).is_empty());
    }

    #[test]
    fn reducer_toggles_one_flag() {
        let previous = Rc::new(BestPracticesState::default());
        let next = best_practices_reducer(&previous, &dispatch_ar_button(false));
        assert!(!next.ar_button);
        assert!(next.progress_bar);
        assert!(previous.ar_button);

        let same = best_practices_reducer(&next, &Action::SetAutoRotate(true));
        assert!(Rc::ptr_eq(&next, &same));
    }

    proptest! {
        #[test]
        fn flags_merge_and_the_rest_pass_through(
            flags in strategies::best_practices(),
            action in strategies::action(),
        ) {
            let previous = Rc::new(flags);
            let next = best_practices_reducer(&previous, &action);

            let expected = match action {
                Action::SetProgressBar(progress_bar) => BestPracticesState { progress_bar, ..flags },
                Action::SetArButton(ar_button) => BestPracticesState { ar_button, ..flags },
                Action::SetArPrompt(ar_prompt) => BestPracticesState { ar_prompt, ..flags },
                _ => {
                    prop_assert!(Rc::ptr_eq(&previous, &next));
                    flags
                }
            };

            prop_assert_eq!(*next, expected);
            prop_assert_eq!(*previous, flags);
        }
    }
}
