//! Outcome-discipline order workflow.

use common::{CustomerId, OrderId, ProductId};
use domain::{Currency, Customer, Fault, Money, Order, OrderStatus, Product};
use outcome::Outcome;
use repository::{CustomerRepository, OrderRepository, ProductRepository};

// The outcome analog of `?`: inspect the step's outcome at the call site
// and return the failure before any later step runs.
macro_rules! check {
    ($outcome:expr) => {
        match $outcome {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => return Outcome::Failure(error),
        }
    };
}

/// Order workflow in the outcome discipline.
///
/// Every fallible step yields an [`Outcome`] that is inspected immediately;
/// a failure is returned without executing subsequent steps. The
/// [`OutcomeOrderWorkflow::place_order`] composite expresses the same
/// discipline as one `bind` chain across the whole lifecycle.
pub struct OutcomeOrderWorkflow<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> OutcomeOrderWorkflow<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    /// Creates a new workflow over the given repositories.
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    async fn fetch_customer(&self, id: CustomerId) -> Outcome<Customer> {
        Outcome::from_result(self.customers.get(id).await)
    }

    async fn fetch_product(&self, id: ProductId) -> Outcome<Product> {
        Outcome::from_result(self.products.get(id).await)
    }

    async fn fetch_order(&self, id: OrderId) -> Outcome<Order> {
        Outcome::from_result(self.orders.get(id).await)
    }

    /// Creates a pending order for an existing customer.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        currency: Currency,
        shipping_address: &str,
    ) -> Outcome<Order> {
        metrics::counter!("orders_created_total", "discipline" => "outcome").increment(1);

        let order = check!(Order::try_create(customer_id, currency, shipping_address));
        check!(self.fetch_customer(customer_id).await);
        check!(Outcome::from_result(self.orders.save(order.clone()).await));
        Outcome::success(order)
    }

    /// Adds a product line to a pending order, reserving stock first.
    ///
    /// The line snapshots the product's current name and price.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Outcome<Order> {
        if quantity == 0 {
            return Outcome::failure(
                Fault::Validation {
                    field: "quantity",
                    reason: "quantity must be greater than 0".to_string(),
                }
                .into(),
            );
        }

        let mut order = check!(self.fetch_order(order_id).await);
        let mut product = check!(self.fetch_product(product_id).await);

        check!(product.try_reserve(quantity));
        check!(order.try_add_item(product.id(), product.name(), product.price(), quantity));

        check!(Outcome::from_result(self.products.save(product).await));
        check!(Outcome::from_result(self.orders.save(order.clone()).await));
        Outcome::success(order)
    }

    /// Submits an order, debiting the customer's credit by its total.
    #[tracing::instrument(skip(self))]
    pub async fn submit_order(&self, order_id: OrderId) -> Outcome<Order> {
        metrics::counter!("orders_submitted_total", "discipline" => "outcome").increment(1);

        let mut order = check!(self.fetch_order(order_id).await);
        let mut customer = check!(self.fetch_customer(order.customer_id()).await);

        check!(order.try_submit());
        check!(customer.try_use_credit(order.total_amount()));

        check!(Outcome::from_result(self.customers.save(customer).await));
        check!(Outcome::from_result(self.orders.save(order.clone()).await));
        Outcome::success(order)
    }

    /// Approves a submitted order against a payment covering its total.
    #[tracing::instrument(skip(self))]
    pub async fn process_payment(&self, order_id: OrderId, payment: Money) -> Outcome<Order> {
        let mut order = check!(self.fetch_order(order_id).await);
        check!(order.try_approve(payment));
        check!(Outcome::from_result(self.orders.save(order.clone()).await));
        Outcome::success(order)
    }

    /// Ships an approved order.
    #[tracing::instrument(skip(self))]
    pub async fn ship_order(&self, order_id: OrderId) -> Outcome<Order> {
        let mut order = check!(self.fetch_order(order_id).await);
        check!(order.try_ship());
        check!(Outcome::from_result(self.orders.save(order.clone()).await));
        Outcome::success(order)
    }

    /// Cancels an order, restoring credit where it was debited and
    /// restocking every reserved line.
    ///
    /// Credit is only restored when cancelling from Submitted or Approved;
    /// restocking always runs because add-item reserved the stock
    /// regardless of how far the order progressed.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId, reason: &str) -> Outcome<Order> {
        metrics::counter!("orders_cancelled_total", "discipline" => "outcome").increment(1);

        let mut order = check!(self.fetch_order(order_id).await);
        let prior_status = order.status();

        check!(order.try_cancel(reason));

        if matches!(prior_status, OrderStatus::Submitted | OrderStatus::Approved) {
            let mut customer = check!(self.fetch_customer(order.customer_id()).await);
            check!(customer.try_restore_credit(order.total_amount()));
            check!(Outcome::from_result(self.customers.save(customer).await));
        }

        let product_ids: Vec<ProductId> =
            order.items().iter().map(|item| item.product_id).collect();
        let mut products = check!(Outcome::from_result(
            self.products.get_many(&product_ids).await
        ));
        for (product, item) in products.iter_mut().zip(order.items()) {
            check!(product.try_restock(item.quantity));
        }
        check!(Outcome::from_result(self.products.save_many(products).await));

        check!(Outcome::from_result(self.orders.save(order.clone()).await));
        Outcome::success(order)
    }

    /// Loads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Outcome<Order> {
        self.fetch_order(order_id).await
    }

    /// Runs the whole lifecycle — create, add every item, submit, pay,
    /// ship — as one `bind` chain: the first failing step short-circuits
    /// everything after it.
    #[tracing::instrument(skip(self))]
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        currency: Currency,
        shipping_address: &str,
        items: Vec<(ProductId, u32)>,
        payment: Money,
    ) -> Outcome<Order> {
        let mut outcome = self
            .create_order(customer_id, currency, shipping_address)
            .await;

        for (product_id, quantity) in items {
            outcome = outcome
                .bind_async(|order| self.add_item(order.id(), product_id, quantity))
                .await;
        }

        outcome
            .bind_async(|order| self.submit_order(order.id()))
            .await
            .bind_async(|order| self.process_payment(order.id(), payment))
            .await
            .bind_async(|order| self.ship_order(order.id()))
            .await
    }
}
