//! Request handler for sdb-server

use sdb_core::expr::tokenize_with_limit;
use sdb_core::{Request, Response, Snapshot};
use tracing::{debug, info, warn};

pub struct Handler {
    snapshot: Snapshot,
    shutdown: bool,
}

impl Handler {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            shutdown: false,
        }
    }

    pub fn handle(&mut self, request: &Request) -> Response {
        match request {
            Request::Load { snapshot } => self.handle_load(snapshot),
            Request::Eval { expr } => self.handle_eval(expr),
            Request::Tokenize { expr } => self.handle_tokenize(expr),
            Request::Shutdown => {
                info!("Shutdown requested");
                self.shutdown = true;
                Response::success()
            }
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    fn handle_load(&mut self, snapshot: &Snapshot) -> Response {
        info!(
            "Loading snapshot: {} registers, {} memory regions, {} words",
            snapshot.registers.len(),
            snapshot.memory.len(),
            snapshot.config.word_width
        );
        self.snapshot = snapshot.clone();
        Response::success()
    }

    fn handle_eval(&self, expr: &str) -> Response {
        debug!("Eval request: expr={}", expr);

        let evaluator = self.snapshot.evaluator();
        match evaluator.evaluate_expression(expr) {
            Ok(value) => Response::eval_result(value, evaluator.config().word_width),
            Err(e) => {
                warn!("Invalid expression {:?}: {}", expr, e);
                Response::error(e.to_string())
            }
        }
    }

    fn handle_tokenize(&self, expr: &str) -> Response {
        debug!("Tokenize request: expr={}", expr);

        let max_tokens = self.snapshot.evaluator().config().max_tokens;
        match tokenize_with_limit(expr, max_tokens) {
            Ok(tokens) => Response::tokens(&tokens),
            Err(e) => Response::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdb_core::protocol::TokenInfo;
    use sdb_core::expr::TokenKind;
    use sdb_core::{EvalConfig, WordWidth};

    fn handler() -> Handler {
        Handler::new(
            Snapshot::default()
                .with_register("sp", 0x1000)
                .with_word(0x1000, 42),
        )
    }

    #[test]
    fn test_eval_success() {
        let mut handler = handler();
        let response = handler.handle(&Request::Eval {
            expr: "*$sp + 1".to_string(),
        });
        match response {
            Response::EvalResult { value, hex } => {
                assert_eq!(value, 43);
                assert_eq!(hex, "0x000000000000002b");
            }
            other => panic!("Expected EvalResult, got {:?}", other),
        }
    }

    #[test]
    fn test_eval_failure_keeps_serving() {
        let mut handler = handler();
        let response = handler.handle(&Request::Eval {
            expr: "1/0".to_string(),
        });
        assert!(matches!(response, Response::Error { ref error } if error == "Division by zero"));

        let response = handler.handle(&Request::Eval {
            expr: "1+1".to_string(),
        });
        assert!(matches!(response, Response::EvalResult { value: 2, .. }));
    }

    #[test]
    fn test_load_replaces_snapshot() {
        let mut handler = handler();
        let snapshot =
            Snapshot::new(EvalConfig::new(WordWidth::Four)).with_register("pc", 0x8000_0000);
        assert!(matches!(
            handler.handle(&Request::Load { snapshot }),
            Response::Success { ok: true }
        ));

        let response = handler.handle(&Request::Eval {
            expr: "$pc".to_string(),
        });
        match response {
            Response::EvalResult { value, hex } => {
                assert_eq!(value, i32::MIN as i64);
                assert_eq!(hex, "0x80000000");
            }
            other => panic!("Expected EvalResult, got {:?}", other),
        }

        let response = handler.handle(&Request::Eval {
            expr: "$sp".to_string(),
        });
        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn test_oversized_expressions_get_a_response() {
        let mut handler = handler();
        let response = handler.handle(&Request::Eval {
            expr: format!("{}*$sp", "-".repeat(100_000)),
        });
        assert!(matches!(response, Response::EvalResult { value: 42, .. }));

        let depth = 100_000;
        let response = handler.handle(&Request::Eval {
            expr: format!("{}1{}", "(".repeat(depth), ")".repeat(depth)),
        });
        match response {
            Response::Error { error } => assert!(error.contains("nested deeper"), "{}", error),
            other => panic!("Expected Error, got {:?}", other),
        }

        let response = handler.handle(&Request::Eval {
            expr: "1+1".to_string(),
        });
        assert!(matches!(response, Response::EvalResult { value: 2, .. }));
    }

    #[test]
    fn test_tokenize() {
        let mut handler = handler();
        let response = handler.handle(&Request::Tokenize {
            expr: "2*-3".to_string(),
        });
        let Response::Tokens { tokens } = response else {
            panic!("Expected Tokens");
        };
        let kinds: Vec<TokenKind> = tokens.iter().map(|t: &TokenInfo| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Decimal, TokenKind::Star, TokenKind::Neg, TokenKind::Decimal]
        );

        let response = handler.handle(&Request::Tokenize {
            expr: "1 ? 2".to_string(),
        });
        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn test_shutdown() {
        let mut handler = handler();
        assert!(!handler.is_shutdown());
        handler.handle(&Request::Shutdown);
        assert!(handler.is_shutdown());
    }
}
