//! Fault-discipline order workflow.

use common::{CustomerId, OrderId, ProductId};
use domain::{Currency, Fault, Money, Order, OrderStatus};
use repository::{CustomerRepository, OrderRepository, ProductRepository};

/// Order workflow in the fault discipline.
///
/// Every fallible step returns `Result<_, Fault>` and is sequenced with
/// `?`: the first fault unwinds the whole call, unmodified, to the caller.
/// Nothing in this service catches or wraps a fault — rendering one is the
/// HTTP boundary's job.
pub struct FaultOrderWorkflow<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> FaultOrderWorkflow<C, P, O>
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

    /// Creates a pending order for an existing customer.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        currency: Currency,
        shipping_address: &str,
    ) -> Result<Order, Fault> {
        metrics::counter!("orders_created_total", "discipline" => "fault").increment(1);

        let order = Order::create(customer_id, currency, shipping_address)?;
        self.customers.get(customer_id).await?;
        self.orders.save(order.clone()).await?;
        Ok(order)
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
    ) -> Result<Order, Fault> {
        if quantity == 0 {
            return Err(Fault::Validation {
                field: "quantity",
                reason: "quantity must be greater than 0".to_string(),
            });
        }

        let mut order = self.orders.get(order_id).await?;
        let mut product = self.products.get(product_id).await?;

        product.reserve(quantity)?;
        order.add_item(product.id(), product.name(), product.price(), quantity)?;

        self.products.save(product).await?;
        self.orders.save(order.clone()).await?;
        Ok(order)
    }

    /// Submits an order, debiting the customer's credit by its total.
    #[tracing::instrument(skip(self))]
    pub async fn submit_order(&self, order_id: OrderId) -> Result<Order, Fault> {
        metrics::counter!("orders_submitted_total", "discipline" => "fault").increment(1);

        let mut order = self.orders.get(order_id).await?;
        let mut customer = self.customers.get(order.customer_id()).await?;

        order.submit()?;
        customer.use_credit(order.total_amount())?;

        self.customers.save(customer).await?;
        self.orders.save(order.clone()).await?;
        Ok(order)
    }

    /// Approves a submitted order against a payment covering its total.
    #[tracing::instrument(skip(self))]
    pub async fn process_payment(
        &self,
        order_id: OrderId,
        payment: Money,
    ) -> Result<Order, Fault> {
        let mut order = self.orders.get(order_id).await?;
        order.approve(payment)?;
        self.orders.save(order.clone()).await?;
        Ok(order)
    }

    /// Ships an approved order.
    #[tracing::instrument(skip(self))]
    pub async fn ship_order(&self, order_id: OrderId) -> Result<Order, Fault> {
        let mut order = self.orders.get(order_id).await?;
        order.ship()?;
        self.orders.save(order.clone()).await?;
        Ok(order)
    }

    /// Cancels an order, restoring credit where it was debited and
    /// restocking every reserved line.
    ///
    /// Credit is only restored when cancelling from Submitted or Approved;
    /// restocking always runs because add-item reserved the stock
    /// regardless of how far the order progressed.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId, reason: &str) -> Result<Order, Fault> {
        metrics::counter!("orders_cancelled_total", "discipline" => "fault").increment(1);

        let mut order = self.orders.get(order_id).await?;
        let prior_status = order.status();

        order.cancel(reason)?;

        if matches!(prior_status, OrderStatus::Submitted | OrderStatus::Approved) {
            let mut customer = self.customers.get(order.customer_id()).await?;
            customer.restore_credit(order.total_amount())?;
            self.customers.save(customer).await?;
        }

        let product_ids: Vec<ProductId> =
            order.items().iter().map(|item| item.product_id).collect();
        let mut products = self.products.get_many(&product_ids).await?;
        for (product, item) in products.iter_mut().zip(order.items()) {
            product.restock(item.quantity)?;
        }
        self.products.save_many(products).await?;

        self.orders.save(order.clone()).await?;
        Ok(order)
    }

    /// Loads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, Fault> {
        self.orders.get(order_id).await
    }

    /// Runs the whole lifecycle — create, add every item, submit, pay,
    /// ship — as ordinary sequential calls; any raised fault unwinds the
    /// chain.
    #[tracing::instrument(skip(self))]
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        currency: Currency,
        shipping_address: &str,
        items: Vec<(ProductId, u32)>,
        payment: Money,
    ) -> Result<Order, Fault> {
        let order = self
            .create_order(customer_id, currency, shipping_address)
            .await?;
        for (product_id, quantity) in items {
            self.add_item(order.id(), product_id, quantity).await?;
        }
        self.submit_order(order.id()).await?;
        self.process_payment(order.id(), payment).await?;
        self.ship_order(order.id()).await
    }
}
