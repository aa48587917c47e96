use crate::SERVER_SCRIPT;
use codestrip_types::rule::{ArtifactKind, Rule, RuleKind, RuleSet};

fn route(id: &str, intent: &str, path_prefix: &str) -> Rule {
    Rule::new(
        id,
        intent,
        RuleKind::StripRouteRegistration {
            receiver: "app".to_string(),
            path_prefix: path_prefix.to_string(),
            methods: codestrip_types::rule::DEFAULT_ROUTE_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        },
    )
}

fn config_field(id: &str, key: &str) -> Rule {
    Rule::new(
        id,
        format!("Drop the `{key}` setting."),
        RuleKind::StripConfigField {
            key: key.to_string(),
        },
    )
}

fn declaration(id: &str, intent: &str, module: &str) -> Rule {
    Rule::new(
        id,
        intent,
        RuleKind::StripDeclaration {
            module: module.to_string(),
        },
    )
}

pub fn server_script() -> RuleSet {
    RuleSet::new(
        SERVER_SCRIPT,
        ArtifactKind::Script,
        vec![
            declaration("stripe-require", "Drop the payment SDK.", "stripe"),
            declaration(
                "payment-service-require",
                "Drop the payment service module.",
                "./services/paymentService",
            ),
            declaration(
                "subscription-service-require",
                "Drop the subscription service module.",
                "./services/subscriptionService",
            ),
            route(
                "payment-routes",
                "Remove every /api/payment endpoint with its handler.",
                "/api/payment",
            ),
            route(
                "subscription-routes",
                "Remove every /api/subscription endpoint with its handler.",
                "/api/subscription",
            ),
            route(
                "stripe-webhook-route",
                "Remove the payment provider webhook endpoint.",
                "/webhook/stripe",
            ),
            config_field("stripe-secret-config", "stripeSecretKey"),
            config_field("stripe-webhook-config", "stripeWebhookSecret"),
            config_field("price-config", "subscriptionPriceId"),
            Rule::new(
                "require-subscription",
                "Turn the subscription middleware into a pass-through.",
                RuleKind::ReplaceFunctionBody {
                    signature: "function requireSubscription".to_string(),
                    body: "{\n  return next();\n}".to_string(),
                },
            ),
            Rule::new(
                "subscription-service-calls",
                "Remove remaining calls into the subscription service.",
                RuleKind::StripStatement {
                    prefix: "subscriptionService.".to_string(),
                },
            ),
            Rule::new(
                "payment-service-calls",
                "Remove remaining calls into the payment service.",
                RuleKind::StripStatement {
                    prefix: "paymentService.".to_string(),
                },
            ),
        ],
    )
    .with_description("HTTP server: payment SDK, billing routes, config and middleware.")
}
