use crate::common::{Action, Result, UnknownActionSnafu, Verb};

#[derive(Default)]
struct Sequencer {
    current: Option<Verb>,
    failed: bool,
}

impl Sequencer {
    fn step(&mut self, token: &str) -> Option<Result<Action>> {
        if let Some(verb) = Verb::from_token(token) {
            self.current = Some(verb);
            return match verb {
                Verb::ListDnsOverrides => Some(Ok(Action::ListOverrides)),
                _ => None,
            };
        }

        Some(match self.current {
            Some(verb @ (Verb::CreateDnsOverride | Verb::DeleteDnsOverride)) => {
                Action::with_argument(verb, token)
            }
            // list_dns_overrides takes no arguments.
            _ => UnknownActionSnafu { action: token }.fail(),
        })
    }
}

/// Turns command tokens into actions. An action name sets the context for
/// the `domain[@ip]` tokens following it. The sequence ends after the
/// first error.
pub fn sequence<I>(tokens: I) -> impl Iterator<Item = Result<Action>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    tokens
        .into_iter()
        .scan(Sequencer::default(), |sequencer, token| {
            if sequencer.failed {
                return None;
            }
            let step = sequencer.step(token.as_ref());
            sequencer.failed = matches!(step, Some(Err(_)));
            Some(step)
        })
        .flatten()
}
